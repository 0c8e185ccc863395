use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Value};
use tantivy::{doc, Index, IndexReader, ReloadPolicy, TantivyDocument};

use recall_core::error::{Error, Result};
use recall_core::traits::{LexicalBackend, SearchQuery};
use recall_core::types::{BackendKind, DocumentChunk, RetrievalHit};

use crate::tantivy_utils::{build_schema, register_tokenizer};

fn lexical_err(e: impl std::fmt::Display) -> Error {
	Error::backend(BackendKind::Lexical, e)
}

/// BM25 lexical backend over an in-memory Tantivy index.
pub struct TantivyBackend {
	index: Index,
	reader: IndexReader,
	id_field: Field,
	document_id_field: Field,
	title_field: Field,
	chunk_index_field: Field,
	text_field: Field,
}

impl TantivyBackend {
	pub fn new(chunks: &[DocumentChunk]) -> Result<Self> {
		let schema = build_schema();
		let index = Index::create_in_ram(schema.clone());
		register_tokenizer(&index);
		let field = |name: &str| schema.get_field(name).map_err(lexical_err);
		let id_field = field("id")?;
		let document_id_field = field("document_id")?;
		let title_field = field("title")?;
		let chunk_index_field = field("chunk_index")?;
		let text_field = field("text")?;

		let mut index_writer = index.writer_with_num_threads(1, 50_000_000).map_err(lexical_err)?;
		for c in chunks {
			index_writer
				.add_document(doc!(
					id_field => c.id.clone(),
					document_id_field => c.document_id.clone(),
					title_field => c.title.clone(),
					chunk_index_field => c.chunk_index as u64,
					text_field => c.content.clone(),
				))
				.map_err(lexical_err)?;
		}
		index_writer.commit().map_err(lexical_err)?;
		let reader = index.reader_builder().reload_policy(ReloadPolicy::Manual).try_into().map_err(lexical_err)?;
		tracing::info!(chunks = chunks.len(), "built lexical index");
		Ok(Self { index, reader, id_field, document_id_field, title_field, chunk_index_field, text_field })
	}

	pub fn num_docs(&self) -> u64 {
		self.reader.searcher().num_docs()
	}

	fn to_hit(&self, doc: &TantivyDocument, score: f32) -> RetrievalHit {
		let text = |f: Field| doc.get_first(f).and_then(|v| v.as_str()).unwrap_or("").to_string();
		let chunk_index = doc.get_first(self.chunk_index_field).and_then(|v| v.as_u64()).unwrap_or(0);
		RetrievalHit {
			document_id: text(self.document_id_field),
			chunk_index: chunk_index as usize,
			content: text(self.text_field),
			title: text(self.title_field),
			backend_score: score,
		}
	}
}

impl LexicalBackend for TantivyBackend {
	fn search(&self, query: &SearchQuery<'_>, k: usize) -> Result<Vec<RetrievalHit>> {
		let searcher = self.reader.searcher();
		// TopDocs preallocates for `k`; never ask for more than the index holds.
		let k = k.min(usize::try_from(searcher.num_docs()).unwrap_or(usize::MAX));
		if query.text.trim().is_empty() || k == 0 { return Ok(vec![]); }
		let qp = QueryParser::for_index(&self.index, vec![self.text_field]);
		let (q, errors) = qp.parse_query_lenient(query.text);
		if !errors.is_empty() { tracing::debug!(?errors, "lenient query parse dropped terms"); }
		let top_docs = searcher.search(&q, &TopDocs::with_limit(k)).map_err(lexical_err)?;
		let mut hits = Vec::with_capacity(top_docs.len());
		for (score, addr) in top_docs {
			let doc: TantivyDocument = searcher.doc(addr).map_err(lexical_err)?;
			tracing::trace!(id = ?doc.get_first(self.id_field).and_then(|v| v.as_str()), score, "lexical hit");
			hits.push(self.to_hit(&doc, score));
		}
		Ok(hits)
	}
}
