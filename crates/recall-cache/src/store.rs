use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use recall_core::error::{Error, Result};
use recall_core::traits::KvStore;

use crate::clock::{expires_at, Clock, SystemClock};

struct Slot {
    value: Vec<u8>,
    expires_at: DateTime<Utc>,
}

/// Process-local key-value store with per-key TTL, checked lazily on read.
pub struct MemoryStore {
    slots: Mutex<HashMap<String, Slot>>,
    clock: Arc<dyn Clock>,
}

impl Default for MemoryStore {
    fn default() -> Self { Self::with_clock(Arc::new(SystemClock)) }
}

impl MemoryStore {
    pub fn new() -> Self { Self::default() }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self { slots: Mutex::new(HashMap::new()), clock }
    }

    pub fn remove(&self, key: &str) -> bool {
        self.slots.lock().remove(key).is_some()
    }

    /// Drop every expired key; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut slots = self.slots.lock();
        let before = slots.len();
        slots.retain(|_, slot| slot.expires_at > now);
        before - slots.len()
    }

    /// Number of live (unexpired) keys.
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.slots.lock().values().filter(|slot| slot.expires_at > now).count()
    }

    pub fn is_empty(&self) -> bool { self.len() == 0 }
}

impl KvStore for MemoryStore {
    fn ping(&self) -> Result<()> { Ok(()) }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let now = self.clock.now();
        let mut slots = self.slots.lock();
        let expired = match slots.get(key) {
            Some(slot) if slot.expires_at > now => return Ok(Some(slot.value.clone())),
            Some(_) => true,
            None => false,
        };
        if expired {
            slots.remove(key);
        }
        Ok(None)
    }

    fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<()> {
        if ttl_seconds == 0 {
            return Err(Error::Store(format!("invalid ttl 0 for key '{key}'")));
        }
        let slot = Slot { value: value.to_vec(), expires_at: expires_at(self.clock.now(), ttl_seconds) };
        self.slots.lock().insert(key.to_string(), slot);
        Ok(())
    }
}
