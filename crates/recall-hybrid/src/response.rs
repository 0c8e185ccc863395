use serde::{Deserialize, Serialize};

use recall_core::config::FusionSettings;
use recall_core::types::{BackendKind, FusedResult, Intent, NormalizedQuery, RetrievalHit};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResultSource {
    Hybrid,
    Vector,
    Lexical,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct FusionWeights {
    pub vector: f32,
    pub lexical: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    pub query: String,
    pub limit: usize,
    pub weight_vector: f32,
    pub weight_lexical: f32,
}

impl SearchRequest {
    /// Request using the configured default limit and weights.
    pub fn new(query: impl Into<String>, defaults: &FusionSettings) -> Self {
        Self {
            query: query.into(),
            limit: defaults.limit,
            weight_vector: defaults.weight_vector,
            weight_lexical: defaults.weight_lexical,
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_weights(mut self, weight_vector: f32, weight_lexical: f32) -> Self {
        self.weight_vector = weight_vector;
        self.weight_lexical = weight_lexical;
        self
    }

    pub fn weights(&self) -> FusionWeights {
        FusionWeights { vector: self.weight_vector, lexical: self.weight_lexical }
    }
}

/// JSON body returned by `fuse_search`; also the payload kept in the cache.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FusedSearchResponse {
    pub query: String,
    pub cleaned_query: String,
    pub intent: Intent,
    pub limit: usize,
    pub source: ResultSource,
    pub weights: FusionWeights,
    pub results: Vec<FusedResult>,
    pub total_found: usize,
    pub cached: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_similarity: Option<f32>,
    /// Backends that failed and were replaced by an empty list.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub degraded: Vec<BackendKind>,
}

impl FusedSearchResponse {
    pub fn new(query: &NormalizedQuery, request: &SearchRequest, results: Vec<FusedResult>) -> Self {
        Self {
            query: query.raw.clone(),
            cleaned_query: query.cleaned.clone(),
            intent: query.intent,
            limit: request.limit,
            source: ResultSource::Hybrid,
            weights: request.weights(),
            total_found: results.len(),
            results,
            cached: false,
            cache_similarity: None,
            degraded: Vec::new(),
        }
    }

    /// Whether this cached response was computed with the same parameters.
    pub fn answers(&self, request: &SearchRequest) -> bool {
        self.limit == request.limit && self.weights == request.weights()
    }
}

/// Body for a single-backend search.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSearchResponse {
    pub query: String,
    pub cleaned_query: String,
    pub intent: Intent,
    pub limit: usize,
    pub source: ResultSource,
    pub results: Vec<RetrievalHit>,
    pub total_found: usize,
}

pub fn round3(x: f32) -> f32 {
    (x * 1000.0).round() / 1000.0
}
