use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

use recall_core::data_processor::{ChunkingConfig, DataProcessor};

#[test]
fn process_directory_single_small_file() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    let file_path = dir.join("a.txt");
    let mut f = fs::File::create(&file_path).unwrap();
    writeln!(f, "Short text").unwrap();

    let processor = DataProcessor::new();
    let chunks = processor.process_directory(dir).expect("process");

    assert_eq!(chunks.len(), 1, "one small paragraph becomes one chunk");
    assert_eq!(chunks[0].content.trim(), "Short text");
    assert_eq!(chunks[0].document_id, "a");
    assert_eq!(chunks[0].title, "a.txt");
    assert_eq!(chunks[0].id, "a:0");
}

#[test]
fn process_directory_ignores_other_extensions() {
    let tmp = TempDir::new().unwrap();
    let dir = tmp.path();
    fs::write(dir.join("a.txt"), "alpha bravo").unwrap();
    fs::write(dir.join("b.md"), "charlie delta").unwrap();

    let chunks = DataProcessor::new().process_directory(dir).expect("process");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].document_id, "a");
}

#[test]
fn paragraphs_become_numbered_chunks() {
    let processor = DataProcessor::new();
    let chunks = processor.chunk_document("first para\n\n\n\nsecond para\n\nthird", Path::new("/tmp/notes.txt"));

    assert_eq!(chunks.len(), 3);
    for (i, c) in chunks.iter().enumerate() {
        assert_eq!(c.chunk_index, i);
        assert_eq!(c.total_chunks, 3);
        assert_eq!(c.document_id, "notes");
    }
    assert_eq!(chunks[1].content, "second para");
}

#[test]
fn long_paragraph_splits_with_overlap() {
    let processor = DataProcessor::with_config(ChunkingConfig { max_words: 4, overlap_percent: 0.5 });
    let text = "w0 w1 w2 w3 w4 w5 w6 w7";
    let chunks = processor.chunk_document(text, Path::new("long.txt"));

    let contents: Vec<&str> = chunks.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, vec!["w0 w1 w2 w3", "w2 w3 w4 w5", "w4 w5 w6 w7"]);
}
