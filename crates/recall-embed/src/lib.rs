//! Embedding providers.
//!
//! The production model lives behind `recall_core::traits::Embedder`; this
//! crate ships the deterministic hashing embedder used for offline runs,
//! demos and tests.

use std::hash::{Hash, Hasher};

use recall_core::error::{Error, Result};
use recall_core::traits::Embedder;
use twox_hash::XxHash64;

/// Bag-of-words feature hashing into an L2-normalized vector.
///
/// Texts sharing most tokens land close together, which is enough for the
/// semantic cache to recognise near-duplicate queries.
pub struct HashEmbedder { dim: usize }

impl HashEmbedder {
    pub fn new(dim: usize) -> Result<Self> {
        if dim == 0 { return Err(Error::InvalidConfig("embedding dim must be positive".to_string())); }
        Ok(Self { dim })
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut v = vec![0f32; self.dim];
        for (i, token) in text.split_whitespace().enumerate() {
            let mut hasher = XxHash64::with_seed(0);
            token.hash(&mut hasher);
            let h = hasher.finish();
            let idx = (h % self.dim as u64) as usize;
            let val = ((h >> 32) as u32) as f32 / u32::MAX as f32;
            v[idx] += 1.0 + 0.5 * val + (i as f32 % 3.0) * 0.01;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 { for x in &mut v { *x /= norm; } }
        v
    }
}

impl Embedder for HashEmbedder {
    fn dim(&self) -> usize { self.dim }

    fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        tracing::trace!(batch = texts.len(), dim = self.dim, "hash embedding");
        Ok(texts.iter().map(|t| self.embed_text(t)).collect())
    }
}

pub fn get_default_embedder(dim: usize) -> Result<Box<dyn Embedder>> {
    Ok(Box::new(HashEmbedder::new(dim)?))
}
