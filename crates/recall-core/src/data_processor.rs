use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::types::DocumentChunk;

#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub max_words: usize,
    pub overlap_percent: f32,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self { max_words: 300, overlap_percent: 0.2 }
    }
}

/// Turns a directory of `.txt` files into paragraph-sized chunks for the demo corpus.
#[derive(Default)]
pub struct DataProcessor {
    chunking_config: ChunkingConfig,
}

impl DataProcessor {
    pub fn new() -> Self { Self::default() }

    pub fn with_config(chunking_config: ChunkingConfig) -> Self { Self { chunking_config } }

    pub fn process_directory(&self, data_dir: &Path) -> Result<Vec<DocumentChunk>> {
        let files = self.list_txt_files(data_dir);
        if files.is_empty() {
            tracing::warn!(dir = %data_dir.display(), "no .txt files found");
            return Ok(vec![]);
        }
        let mut all_chunks = Vec::new();
        for file_path in &files {
            let content = self.read_file_content(file_path)?;
            let chunks = self.chunk_document(&content, file_path);
            tracing::debug!(path = %file_path.display(), chunks = chunks.len(), "chunked file");
            all_chunks.extend(chunks);
        }
        tracing::info!(files = files.len(), chunks = all_chunks.len(), "processed corpus");
        Ok(all_chunks)
    }

    /// Split `content` into chunks: one per blank-line paragraph, with long
    /// paragraphs cut into overlapping word windows.
    pub fn chunk_document(&self, content: &str, file_path: &Path) -> Vec<DocumentChunk> {
        let document_id = file_path.file_stem().map_or_else(|| "unknown".to_string(), |s| s.to_string_lossy().to_string());
        let title = file_path.file_name().map_or_else(|| document_id.clone(), |s| s.to_string_lossy().to_string());
        let doc_path = file_path.to_string_lossy().to_string();

        let mut pieces = Vec::new();
        for paragraph in content.split("\n\n") {
            let paragraph = paragraph.trim();
            if paragraph.is_empty() { continue; }
            if paragraph.split_whitespace().count() <= self.chunking_config.max_words {
                pieces.push(paragraph.to_string());
            } else {
                pieces.extend(self.split_paragraph_with_overlap(paragraph));
            }
        }
        let total_chunks = pieces.len();
        pieces
            .into_iter()
            .enumerate()
            .map(|(chunk_index, content)| DocumentChunk {
                id: format!("{document_id}:{chunk_index}"),
                document_id: document_id.clone(),
                title: title.clone(),
                doc_path: doc_path.clone(),
                content,
                chunk_index,
                total_chunks,
            })
            .collect()
    }

    fn read_file_content(&self, file_path: &Path) -> Result<String> {
        match fs::read_to_string(file_path) {
            Ok(content) => Ok(content),
            Err(_) => Ok(String::from_utf8_lossy(&fs::read(file_path)?).to_string()),
        }
    }

    fn split_paragraph_with_overlap(&self, paragraph: &str) -> Vec<String> {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        let per_chunk = self.chunking_config.max_words.max(1);
        let overlap = ((per_chunk as f32 * self.chunking_config.overlap_percent) as usize).min(per_chunk - 1);
        let mut chunks = Vec::new();
        let mut start = 0;
        while start < words.len() {
            let end = (start + per_chunk).min(words.len());
            chunks.push(words[start..end].join(" "));
            if end >= words.len() { break; }
            start = end - overlap;
        }
        chunks
    }

    fn list_txt_files(&self, root: &Path) -> Vec<PathBuf> {
        let mut txt_files: Vec<PathBuf> = walkdir::WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().and_then(|s| s.to_str()) == Some("txt"))
            .map(|e| e.path().to_path_buf())
            .collect();
        txt_files.sort();
        txt_files
    }
}
