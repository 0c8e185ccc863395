//! recall-text
//!
//! Query normalization plus a Tantivy-based lexical backend.

pub mod index;
pub mod normalize;
pub mod tantivy_utils;

pub use index::TantivyBackend;
pub use normalize::{detect_intent, QueryNormalizer, STOPWORDS};
