use serde::{Deserialize, Serialize};

use recall_core::similarity::cosine_similarity;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    pub query: String,
    pub embedding: Vec<f32>,
}

/// Cached query strings and their embeddings, oldest first.
///
/// Persisted as a single blob; the order doubles as the eviction order.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CacheIndex {
    pub entries: Vec<IndexEntry>,
}

impl CacheIndex {
    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn contains(&self, query: &str) -> bool {
        self.entries.iter().any(|e| e.query == query)
    }

    /// Insert or refresh `query` as the newest entry, then evict the oldest
    /// entries beyond `max_entries`. Returns the evicted query strings.
    pub fn upsert(&mut self, query: &str, embedding: Vec<f32>, max_entries: usize) -> Vec<String> {
        self.entries.retain(|e| e.query != query);
        self.entries.push(IndexEntry { query: query.to_string(), embedding });
        let excess = self.entries.len().saturating_sub(max_entries.max(1));
        self.entries.drain(..excess).map(|e| e.query).collect()
    }

    /// Most similar cached query. Only strictly positive similarities
    /// qualify; on ties the earlier entry wins.
    pub fn best_match(&self, embedding: &[f32]) -> Option<(&str, f32)> {
        let mut best: Option<(&str, f32)> = None;
        for entry in &self.entries {
            let similarity = cosine_similarity(embedding, &entry.embedding);
            if similarity > best.map_or(0.0, |(_, s)| s) {
                best = Some((entry.query.as_str(), similarity));
            }
        }
        best
    }
}
