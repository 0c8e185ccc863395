use recall_core::error::{Error, Result};
use recall_core::similarity::cosine_similarity;
use recall_core::traits::{Embedder, VectorBackend};
use recall_core::types::{DocumentChunk, RetrievalHit};

const EMBED_BATCH_SIZE: usize = 64;

/// Exact nearest-neighbour search by cosine similarity over every stored row.
pub struct FlatVectorIndex {
	rows: Vec<(DocumentChunk, Vec<f32>)>,
	dim: usize,
}

impl FlatVectorIndex {
	pub fn new(dim: usize) -> Self {
		Self { rows: Vec::new(), dim }
	}

	/// Embed `chunks` in batches and index them.
	pub fn build(embedder: &dyn Embedder, chunks: &[DocumentChunk]) -> Result<Self> {
		let mut index = Self::new(embedder.dim());
		for batch in chunks.chunks(EMBED_BATCH_SIZE) {
			let texts: Vec<String> = batch.iter().map(|c| c.content.clone()).collect();
			let embeddings = embedder.embed_batch(&texts)?;
			index.insert(batch, &embeddings)?;
		}
		tracing::info!(chunks = index.len(), dim = index.dim, "built vector index");
		Ok(index)
	}

	pub fn insert(&mut self, chunks: &[DocumentChunk], embeddings: &[Vec<f32>]) -> Result<()> {
		if chunks.len() != embeddings.len() {
			return Err(Error::InvalidConfig(format!(
				"{} chunks but {} embeddings",
				chunks.len(),
				embeddings.len()
			)));
		}
		if let Some(bad) = embeddings.iter().find(|e| e.len() != self.dim) {
			return Err(Error::InvalidConfig(format!("expected dim {}, got {}", self.dim, bad.len())));
		}
		self.rows.extend(chunks.iter().cloned().zip(embeddings.iter().cloned()));
		Ok(())
	}

	pub fn len(&self) -> usize { self.rows.len() }

	pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}

impl VectorBackend for FlatVectorIndex {
	fn search(&self, query_vec: &[f32], k: usize) -> Result<Vec<RetrievalHit>> {
		if query_vec.len() != self.dim {
			return Err(Error::InvalidConfig(format!("query dim {} != index dim {}", query_vec.len(), self.dim)));
		}
		let mut scored: Vec<(f32, &DocumentChunk)> =
			self.rows.iter().map(|(chunk, v)| (cosine_similarity(query_vec, v), chunk)).collect();
		// stable: equal scores keep insertion order
		scored.sort_by(|a, b| b.0.total_cmp(&a.0));
		let k = k.min(scored.len());
		Ok(scored.into_iter().take(k).map(|(score, chunk)| RetrievalHit::from_chunk(chunk, score)).collect())
	}
}
