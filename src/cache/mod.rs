//! Cache Module
//!
//! Three interchangeable in-memory engines behind one contract:
//! a TTL map, a bounded LRU and a growth-optimized concurrent map.

mod entry;
mod factory;
mod growth;
mod lru;
mod ttl;

#[cfg(test)]
mod property_tests;

use std::hash::Hash;

use crate::config::EngineKind;
use crate::error::Result;

// Re-export public types
pub use entry::CacheEntry;
pub use factory::new_cache;
pub use growth::GrowthCache;
pub use lru::LruCache;
pub use ttl::TtlCache;

/// Bounds every cache key must satisfy.
pub trait CacheKey: Eq + Hash + Clone + Send + Sync + 'static {}

impl<T> CacheKey for T where T: Eq + Hash + Clone + Send + Sync + 'static {}

/// Bounds every cache value must satisfy.
pub trait CacheValue: Clone + Send + Sync + 'static {}

impl<T> CacheValue for T where T: Clone + Send + Sync + 'static {}

// == Storage Contract ==
/// Operations shared by all engines. Every method is safe to call from many
/// threads at once.
pub trait Storage<K, V>: Send + Sync {
    /// Returns the current value, or [`CacheError::NotFound`] when the key is
    /// absent or its entry has expired. The LRU engine also promotes the key
    /// to most-recently-used.
    ///
    /// [`CacheError::NotFound`]: crate::error::CacheError::NotFound
    fn get(&self, key: &K) -> Result<V>;

    /// Inserts or overwrites a value.
    fn put(&self, key: K, value: V);

    /// Removes a key. Absent keys are ignored.
    fn delete(&self, key: &K);

    /// Clears every entry while keeping the engine usable.
    fn drop_all(&self);

    /// Number of physically stored entries. TTL and growth engines may count
    /// expired entries the sweep has not reached yet.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Which engine implements this cache.
    fn kind(&self) -> EngineKind;
}
