use crate::error::{Error, Result};
use crate::types::RetrievalHit;

pub trait Embedder: Send + Sync {
    fn dim(&self) -> usize;
    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Provider("provider returned no embedding".to_string()))
    }
}

/// Query handed to the lexical side, which may score on text, vector, or both.
#[derive(Debug, Clone, Copy)]
pub struct SearchQuery<'a> {
    pub text: &'a str,
    pub vector: &'a [f32],
}

pub trait VectorBackend: Send + Sync {
    fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<RetrievalHit>>;
}

pub trait LexicalBackend: Send + Sync {
    fn search(&self, query: &SearchQuery<'_>, k: usize) -> Result<Vec<RetrievalHit>>;
}

/// Byte-oriented store with per-write expiry.
pub trait KvStore: Send + Sync {
    /// Cheap reachability probe, called once when a cache is built on top.
    fn ping(&self) -> Result<()>;
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;
    fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()>;
}
