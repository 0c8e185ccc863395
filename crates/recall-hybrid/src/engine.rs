use std::sync::Arc;

use tokio::task::JoinError;

use recall_cache::{CacheHit, SemanticCache};
use recall_core::config::{validate_weights, FusionSettings, Settings};
use recall_core::error::{Error, Result};
use recall_core::traits::{Embedder, LexicalBackend, SearchQuery, VectorBackend};
use recall_core::types::{BackendKind, NormalizedQuery, RetrievalHit};
use recall_text::QueryNormalizer;

use crate::fusion::fuse;
use crate::response::{round3, BackendSearchResponse, FusedSearchResponse, ResultSource, SearchRequest};

pub struct HybridSearchEngine<VB, LB>
where
    VB: VectorBackend + 'static,
    LB: LexicalBackend + 'static,
{
    vector: Arc<VB>,
    lexical: Arc<LB>,
    embedder: Arc<dyn Embedder>,
    cache: Arc<SemanticCache>,
    normalizer: QueryNormalizer,
    fusion: FusionSettings,
    cache_ttl_seconds: u64,
}

impl<VB, LB> HybridSearchEngine<VB, LB>
where
    VB: VectorBackend + 'static,
    LB: LexicalBackend + 'static,
{
    pub fn new(vector: VB, lexical: LB, embedder: Arc<dyn Embedder>, cache: Arc<SemanticCache>, settings: &Settings) -> Self {
        Self {
            vector: Arc::new(vector),
            lexical: Arc::new(lexical),
            embedder,
            cache,
            normalizer: QueryNormalizer::default(),
            fusion: settings.fusion.clone(),
            cache_ttl_seconds: settings.cache.ttl_seconds,
        }
    }

    pub fn with_normalizer(mut self, normalizer: QueryNormalizer) -> Self {
        self.normalizer = normalizer;
        self
    }

    pub fn request(&self, query: impl Into<String>) -> SearchRequest {
        SearchRequest::new(query, &self.fusion)
    }

    pub fn cache(&self) -> &SemanticCache { &self.cache }

    /// normalize -> embed -> cache lookup -> (miss) both backends concurrently -> fuse -> cache store.
    ///
    /// Only invalid weights produce an error; collaborator failures degrade
    /// to empty hit lists and are listed in `degraded`. Every collaborator
    /// call runs on the blocking pool, and the query is embedded once for
    /// the cache and the vector backend together.
    pub async fn fuse_search(&self, request: &SearchRequest) -> Result<FusedSearchResponse> {
        validate_weights(request.weight_vector, request.weight_lexical)?;
        let query = self.normalizer.normalize(&request.query);
        if query.cleaned.is_empty() {
            tracing::debug!(raw = %query.raw, "query empty after normalization");
            return Ok(FusedSearchResponse::new(&query, request, Vec::new()));
        }

        let query_vec = self.embed_query(&query.cleaned).await;
        if let Some(query_vec) = &query_vec {
            if let Some(hit) = self.cached_response(&query.cleaned, query_vec.clone()).await {
                if hit.payload.answers(request) {
                    let mut response = hit.payload;
                    response.query = query.raw.clone();
                    response.cleaned_query = query.cleaned.clone();
                    response.intent = query.intent;
                    response.cached = true;
                    response.cache_similarity = Some(round3(hit.similarity));
                    return Ok(response);
                }
                tracing::debug!(matched = %hit.matched_query, "cached response has different limit or weights");
            }
        }

        let candidates = request.limit.saturating_mul(self.fusion.candidate_multiplier);
        let (vector_hits, lexical_hits, degraded) = self.search_both(&query, query_vec.clone(), candidates).await;
        let results = fuse(&vector_hits, &lexical_hits, request.weight_vector, request.weight_lexical, request.limit);
        tracing::debug!(
            vector = vector_hits.len(),
            lexical = lexical_hits.len(),
            fused = results.len(),
            "fused hybrid results"
        );

        let mut response = FusedSearchResponse::new(&query, request, results);
        response.degraded = degraded;
        if response.degraded.is_empty() {
            if let Some(query_vec) = query_vec {
                self.store_response(query.cleaned.clone(), query_vec, response.clone()).await;
            }
        }
        Ok(response)
    }

    async fn embed_query(&self, text: &str) -> Option<Vec<f32>> {
        let embedder = Arc::clone(&self.embedder);
        let text = text.to_string();
        match tokio::task::spawn_blocking(move || embedder.embed(&text)).await {
            Ok(Ok(v)) => Some(v),
            Ok(Err(e)) => {
                tracing::warn!(error = %e, "query embedding failed; vector backend and cache skipped");
                None
            }
            Err(e) => {
                tracing::warn!(error = %e, "query embedding task aborted");
                None
            }
        }
    }

    async fn cached_response(&self, cleaned: &str, query_vec: Vec<f32>) -> Option<CacheHit<FusedSearchResponse>> {
        let cache = Arc::clone(&self.cache);
        let key = cleaned.to_string();
        tokio::task::spawn_blocking(move || cache.get_with_embedding::<FusedSearchResponse>(&key, &query_vec))
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "cache lookup task aborted; treating as miss");
                None
            })
    }

    async fn store_response(&self, cleaned: String, query_vec: Vec<f32>, response: FusedSearchResponse) {
        let cache = Arc::clone(&self.cache);
        let ttl = self.cache_ttl_seconds;
        let stored = tokio::task::spawn_blocking(move || cache.set_with_embedding(&cleaned, query_vec, &response, ttl)).await;
        if let Err(e) = stored {
            tracing::warn!(error = %e, "cache store task aborted");
        }
    }

    async fn search_both(
        &self,
        query: &NormalizedQuery,
        query_vec: Option<Vec<f32>>,
        k: usize,
    ) -> (Vec<RetrievalHit>, Vec<RetrievalHit>, Vec<BackendKind>) {
        let vector_task = {
            let backend = Arc::clone(&self.vector);
            let query_vec = query_vec.clone();
            tokio::task::spawn_blocking(move || match query_vec {
                Some(v) => backend.search(&v, k),
                None => Err(Error::Provider("no query embedding".to_string())),
            })
        };
        let lexical_task = {
            let backend = Arc::clone(&self.lexical);
            let text = query.cleaned.clone();
            let query_vec = query_vec.unwrap_or_default();
            tokio::task::spawn_blocking(move || backend.search(&SearchQuery { text: &text, vector: &query_vec }, k))
        };
        let (vector_outcome, lexical_outcome) = tokio::join!(vector_task, lexical_task);

        let mut degraded = Vec::new();
        let vector_hits = settle(BackendKind::Vector, vector_outcome).unwrap_or_else(|| {
            degraded.push(BackendKind::Vector);
            Vec::new()
        });
        let lexical_hits = settle(BackendKind::Lexical, lexical_outcome).unwrap_or_else(|| {
            degraded.push(BackendKind::Lexical);
            Vec::new()
        });
        (vector_hits, lexical_hits, degraded)
    }

    /// Vector backend only, no cache and no fusion.
    pub async fn search_vector(&self, raw: &str, limit: usize) -> Result<BackendSearchResponse> {
        let query = self.normalizer.normalize(raw);
        let embedder = Arc::clone(&self.embedder);
        let backend = Arc::clone(&self.vector);
        let text = query.cleaned.clone();
        let hits = tokio::task::spawn_blocking(move || backend.search(&embedder.embed(&text)?, limit))
            .await
            .map_err(|e| Error::backend(BackendKind::Vector, e))??;
        Ok(single_backend_response(query, limit, ResultSource::Vector, hits))
    }

    /// Lexical backend only, no cache and no fusion. An embedding failure
    /// leaves the query vector empty rather than failing the search.
    pub async fn search_lexical(&self, raw: &str, limit: usize) -> Result<BackendSearchResponse> {
        let query = self.normalizer.normalize(raw);
        let embedder = Arc::clone(&self.embedder);
        let backend = Arc::clone(&self.lexical);
        let text = query.cleaned.clone();
        let hits = tokio::task::spawn_blocking(move || {
            let query_vec = embedder.embed(&text).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "query embedding failed; lexical search without a vector");
                Vec::new()
            });
            backend.search(&SearchQuery { text: &text, vector: &query_vec }, limit)
        })
        .await
        .map_err(|e| Error::backend(BackendKind::Lexical, e))??;
        Ok(single_backend_response(query, limit, ResultSource::Lexical, hits))
    }
}

fn settle(backend: BackendKind, outcome: std::result::Result<Result<Vec<RetrievalHit>>, JoinError>) -> Option<Vec<RetrievalHit>> {
    match outcome {
        Ok(Ok(hits)) => Some(hits),
        Ok(Err(e)) => {
            tracing::warn!(%backend, error = %e, "backend failed; using empty hit list");
            None
        }
        Err(e) => {
            tracing::warn!(%backend, error = %e, "backend task aborted; using empty hit list");
            None
        }
    }
}

fn single_backend_response(query: NormalizedQuery, limit: usize, source: ResultSource, results: Vec<RetrievalHit>) -> BackendSearchResponse {
    BackendSearchResponse {
        total_found: results.len(),
        query: query.raw,
        cleaned_query: query.cleaned,
        intent: query.intent,
        limit,
        source,
        results,
    }
}
