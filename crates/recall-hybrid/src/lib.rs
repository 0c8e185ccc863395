//! recall-hybrid
//!
//! Fuses the vector and lexical backends into one ranking and fronts the
//! pipeline with the semantic cache.

pub mod engine;
pub mod fusion;
pub mod response;

pub use engine::HybridSearchEngine;
pub use fusion::{fuse, rank_score};
pub use response::{BackendSearchResponse, FusedSearchResponse, FusionWeights, ResultSource, SearchRequest};
