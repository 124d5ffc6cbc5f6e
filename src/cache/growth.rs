//! Growth-Optimized Cache
//!
//! Sharded concurrent map for write-once/read-many workloads. Readers never
//! block each other and writers only contend on the shard that owns their
//! key. There is no capacity bound.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheValue, Storage};
use crate::config::{CacheConfig, EngineKind};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweep_task, Sweep, SweepHandle};

#[derive(Debug)]
struct GrowthStore<K: CacheKey, V> {
    entries: DashMap<K, CacheEntry<V>>,
}

impl<K: CacheKey, V: CacheValue> Sweep for GrowthStore<K, V> {
    /// Deletes expired entries during a single traversal.
    fn sweep_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        removed
    }
}

/// Concurrent cache that works best when values are rarely overwritten.
#[derive(Debug)]
pub struct GrowthCache<K: CacheKey, V> {
    store: Arc<GrowthStore<K, V>>,
    timeout: Duration,
    sweeper: Option<SweepHandle>,
}

impl<K: CacheKey, V: CacheValue> GrowthCache<K, V> {
    /// Creates a growth-optimized cache, starting its sweep task if the
    /// config enables it. Sweeping needs a running tokio runtime.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(GrowthStore {
            entries: DashMap::new(),
        });
        let sweeper = if config.sweep_enabled {
            Some(spawn_sweep_task(
                Arc::downgrade(&store),
                config.sweep_interval,
                EngineKind::GrowthOptimized,
            )?)
        } else {
            None
        };

        debug!(
            "Growth-optimized cache created: timeout={:?}, sweep_enabled={}",
            config.timeout, config.sweep_enabled
        );

        Ok(Self {
            store,
            timeout: config.timeout,
            sweeper,
        })
    }

    /// Runs one sweep pass immediately. Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        self.store.sweep_expired()
    }

    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl<K: CacheKey, V: CacheValue> Storage<K, V> for GrowthCache<K, V> {
    fn get(&self, key: &K) -> Result<V> {
        let now = Instant::now();
        match self.store.entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => Ok(entry.value.clone()),
            _ => Err(CacheError::NotFound),
        }
    }

    fn put(&self, key: K, value: V) {
        self.store
            .entries
            .insert(key, CacheEntry::new(value, self.timeout));
    }

    fn delete(&self, key: &K) {
        self.store.entries.remove(key);
    }

    /// Clears shard by shard; a concurrent `put` may land in a shard that
    /// was already cleared.
    fn drop_all(&self) {
        self.store.entries.clear();
    }

    fn len(&self) -> usize {
        self.store.entries.len()
    }

    fn kind(&self) -> EngineKind {
        EngineKind::GrowthOptimized
    }
}
