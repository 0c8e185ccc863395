//! recall-vector
//!
//! In-memory vector backend. Rows are `(DocumentChunk, embedding)` pairs
//! scored by exact cosine similarity.

pub mod flat;

pub use flat::FlatVectorIndex;
