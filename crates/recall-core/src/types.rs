//! Domain types shared by the normalizer, backends, cache and fusion.

use serde::{Deserialize, Serialize};
use std::fmt;

pub type ChunkId = String;

/// A chunk of a source document that is independently indexed.
///
/// - `id`: globally unique chunk identifier (`document_id:chunk_index`)
/// - `document_id`: stable document identity (file stem or external id)
/// - `title`: human-readable document title, usually the file name
/// - `doc_path`: original path to the source file
/// - `content`: the text payload of the chunk
/// - `chunk_index`/`total_chunks`: position within the parent document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DocumentChunk {
    pub id: ChunkId,
    pub document_id: String,
    pub title: String,
    pub doc_path: String,
    pub content: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// Coarse query intent, decided by keyword rules in the normalizer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    Informational,
    Transactional,
    Navigational,
    #[default]
    Unknown,
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Intent::Informational => "informational",
            Intent::Transactional => "transactional",
            Intent::Navigational => "navigational",
            Intent::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// A raw query together with its cleaned form and detected intent.
///
/// Derived deterministically from `raw`; never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub raw: String,
    pub cleaned: String,
    pub intent: Intent,
}

/// Indicates which backend produced a hit.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Vector,
    Lexical,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Vector => f.write_str("vector"),
            BackendKind::Lexical => f.write_str("lexical"),
        }
    }
}

/// A candidate chunk as ranked by one backend.
///
/// `backend_score` is on the backend's own scale and is never compared
/// across backends.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievalHit {
    pub document_id: String,
    pub chunk_index: usize,
    pub content: String,
    pub title: String,
    pub backend_score: f32,
}

impl RetrievalHit {
    pub fn from_chunk(chunk: &DocumentChunk, backend_score: f32) -> Self {
        Self {
            document_id: chunk.document_id.clone(),
            chunk_index: chunk.chunk_index,
            content: chunk.content.clone(),
            title: chunk.title.clone(),
            backend_score,
        }
    }

    pub fn key(&self) -> FusionKey {
        FusionKey { document_id: self.document_id.clone(), chunk_index: self.chunk_index }
    }
}

/// Identity of a fusable unit across both backends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FusionKey {
    pub document_id: String,
    pub chunk_index: usize,
}

/// One entry of the fused ranking.
///
/// `combined_score = vector_rank_score * weight_vector + lexical_rank_score * weight_lexical`;
/// a side that did not return the unit contributes 0.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FusedResult {
    pub content: String,
    pub document_id: String,
    pub chunk_index: usize,
    pub title: String,
    pub vector_rank_score: f32,
    pub lexical_rank_score: f32,
    pub combined_score: f32,
}

impl FusedResult {
    pub fn key(&self) -> FusionKey {
        FusionKey { document_id: self.document_id.clone(), chunk_index: self.chunk_index }
    }
}
