//! recall-cache
//!
//! Semantic query cache over a TTL key-value store. Layout in the store:
//!
//! - `semantic_cache:index` holds every cached query with its embedding
//! - `semantic_cache:result:<query>` holds the payload for one query
//!
//! Both keys expire independently, so an index entry may outlive its result
//! (a "phantom hit"); lookups treat that as a miss.

pub mod clock;
pub mod index;
pub mod semantic;
pub mod store;

pub use clock::{Clock, ManualClock, SystemClock};
pub use index::{CacheIndex, IndexEntry};
pub use semantic::{result_key, CacheEntry, CacheHit, SemanticCache, INDEX_KEY};
pub use store::MemoryStore;
