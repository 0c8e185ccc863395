use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use recall_core::config::CacheSettings;
use recall_core::error::{Error, Result};
use recall_core::traits::{Embedder, KvStore};

use crate::clock::{expires_at, Clock, SystemClock};
use crate::index::CacheIndex;

pub const INDEX_KEY: &str = "semantic_cache:index";
const RESULT_KEY_PREFIX: &str = "semantic_cache:result:";

pub fn result_key(query: &str) -> String {
    format!("{RESULT_KEY_PREFIX}{query}")
}

/// Result blob stored under `result_key(query)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub query: String,
    pub embedding: Vec<f32>,
    pub payload: T,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CacheHit<T> {
    pub payload: T,
    pub similarity: f32,
    /// The cached query string that answered this lookup.
    pub matched_query: String,
}

/// Embedding-keyed cache answering queries that are near-duplicates of ones
/// already answered.
///
/// Fails open: store outages, embedding failures and corrupt blobs all read
/// as misses and make `set` a no-op. A store that fails its ping at
/// construction disables the cache for the life of the value.
///
/// Index updates are serialized by an in-process lock. Several processes
/// sharing one store can still overwrite each other's index merges.
pub struct SemanticCache {
    store: Option<Arc<dyn KvStore>>,
    embedder: Arc<dyn Embedder>,
    clock: Arc<dyn Clock>,
    similarity_threshold: f32,
    max_entries: usize,
    index_lock: Mutex<()>,
}

impl SemanticCache {
    pub fn new(store: Arc<dyn KvStore>, embedder: Arc<dyn Embedder>, settings: &CacheSettings) -> Self {
        let store = match store.ping() {
            Ok(()) => Some(store),
            Err(e) => {
                tracing::warn!(error = %e, "cache store unreachable; semantic cache disabled");
                None
            }
        };
        Self {
            store,
            embedder,
            clock: Arc::new(SystemClock),
            similarity_threshold: settings.similarity_threshold,
            max_entries: settings.max_entries,
            index_lock: Mutex::new(()),
        }
    }

    /// A cache that never hits and never stores.
    pub fn disabled(embedder: Arc<dyn Embedder>, settings: &CacheSettings) -> Self {
        Self {
            store: None,
            embedder,
            clock: Arc::new(SystemClock),
            similarity_threshold: settings.similarity_threshold,
            max_entries: settings.max_entries,
            index_lock: Mutex::new(()),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn is_enabled(&self) -> bool { self.store.is_some() }

    pub fn similarity_threshold(&self) -> f32 { self.similarity_threshold }

    pub fn get<T: DeserializeOwned>(&self, query: &str) -> Option<CacheHit<T>> {
        self.store.as_ref()?;
        let embedding = match self.embedder.embed(query) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "embedding failed; treating as cache miss");
                return None;
            }
        };
        self.get_with_embedding(query, &embedding)
    }

    /// Lookup with an embedding of `query` the caller already computed.
    pub fn get_with_embedding<T: DeserializeOwned>(&self, query: &str, embedding: &[f32]) -> Option<CacheHit<T>> {
        let store = self.store.as_deref()?;

        let index = match load_index(store) {
            Ok(Some(index)) => index,
            Ok(None) => {
                tracing::debug!(query, "cache miss: no index");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cache index unreadable; treating as miss");
                return None;
            }
        };

        let Some((matched, similarity)) = index.best_match(embedding) else {
            tracing::debug!(query, entries = index.len(), "cache miss: no similar query");
            return None;
        };
        if similarity < self.similarity_threshold {
            tracing::debug!(query, matched, similarity, "cache miss: below threshold");
            return None;
        }

        let entry: CacheEntry<T> = match store.get(&result_key(matched)) {
            Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!(error = %e, matched, "corrupt cache entry; treating as miss");
                    return None;
                }
            },
            Ok(None) => {
                tracing::debug!(query, matched, "phantom hit: result expired before index");
                return None;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cache store read failed; treating as miss");
                return None;
            }
        };
        if entry.expires_at <= self.clock.now() {
            tracing::debug!(query, matched, "phantom hit: result past its expiry");
            return None;
        }

        tracing::debug!(query, matched, similarity, "cache hit");
        Some(CacheHit { payload: entry.payload, similarity, matched_query: matched.to_string() })
    }

    /// Best effort: failures are logged, never returned.
    pub fn set<T: Serialize>(&self, query: &str, payload: &T, ttl_seconds: u64) {
        if self.store.is_none() { return; }
        let embedding = match self.embedder.embed(query) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = %e, "embedding failed; result not cached");
                return;
            }
        };
        self.set_with_embedding(query, embedding, payload, ttl_seconds);
    }

    /// `set` with a precomputed embedding of `query`.
    pub fn set_with_embedding<T: Serialize>(&self, query: &str, embedding: Vec<f32>, payload: &T, ttl_seconds: u64) {
        let Some(store) = self.store.as_deref() else { return };

        // Result first, so the index never points at a blob not yet written.
        let entry = CacheEntry {
            query: query.to_string(),
            embedding: embedding.clone(),
            payload,
            expires_at: expires_at(self.clock.now(), ttl_seconds),
        };
        if let Err(e) = write_json(store, &result_key(query), &entry, ttl_seconds) {
            tracing::warn!(error = %e, query, "failed to write cache entry");
            return;
        }

        let _guard = self.index_lock.lock();
        let mut index = match load_index(store) {
            Ok(index) => index.unwrap_or_default(),
            Err(Error::Serialization(e)) => {
                tracing::warn!(error = %e, "discarding corrupt cache index");
                CacheIndex::default()
            }
            Err(e) => {
                tracing::warn!(error = %e, "cache index unreadable; result not indexed");
                return;
            }
        };
        let evicted = index.upsert(query, embedding, self.max_entries);
        if !evicted.is_empty() {
            tracing::debug!(evicted = evicted.len(), "cache index over capacity");
        }
        if let Err(e) = write_json(store, INDEX_KEY, &index, ttl_seconds) {
            tracing::warn!(error = %e, "failed to write cache index");
        }
    }
}

fn load_index(store: &dyn KvStore) -> Result<Option<CacheIndex>> {
    match store.get(INDEX_KEY)? {
        Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
        None => Ok(None),
    }
}

fn write_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T, ttl_seconds: u64) -> Result<()> {
    let bytes = serde_json::to_vec(value)?;
    store.set(key, &bytes, ttl_seconds)
}
