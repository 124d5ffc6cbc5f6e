//! TTL Map Cache
//!
//! Hash map guarded by a single reader/writer lock. Every entry carries an
//! absolute expiry; reads check it lazily and an optional background sweep
//! purges what has gone stale.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use tracing::debug;

use crate::cache::{CacheEntry, CacheKey, CacheValue, Storage};
use crate::config::{CacheConfig, EngineKind};
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweep_task, Sweep, SweepHandle};

// == TTL Store ==
/// Lock-guarded map shared between the cache and its sweep task.
#[derive(Debug)]
struct TtlStore<K, V> {
    entries: RwLock<HashMap<K, CacheEntry<V>>>,
}

impl<K: CacheKey, V: CacheValue> TtlStore<K, V> {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Collects expired keys under the shared lock.
    fn find_expired(&self, now: Instant) -> Vec<K> {
        self.entries
            .read()
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect()
    }

    /// Removes the given keys under the exclusive lock.
    fn remove_keys(&self, keys: &[K]) -> usize {
        let mut entries = self.entries.write();
        keys.iter().filter(|key| entries.remove(*key).is_some()).count()
    }
}

impl<K: CacheKey, V: CacheValue> Sweep for TtlStore<K, V> {
    /// Scan and removal take the lock separately, so a key refreshed by a
    /// `put` between the two phases can be purged along with the stale ones.
    fn sweep_expired(&self) -> usize {
        let expired = self.find_expired(Instant::now());
        if expired.is_empty() {
            return 0;
        }
        self.remove_keys(&expired)
    }
}

// == TTL Cache ==
/// Map-based cache with per-entry expiry. Performs well for most workloads.
#[derive(Debug)]
pub struct TtlCache<K, V> {
    store: Arc<TtlStore<K, V>>,
    timeout: Duration,
    sweeper: Option<SweepHandle>,
}

impl<K: CacheKey, V: CacheValue> TtlCache<K, V> {
    // == Constructor ==
    /// Creates a TTL cache, starting its sweep task if the config enables it.
    ///
    /// Sweeping needs a running tokio runtime.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        config.validate()?;

        let store = Arc::new(TtlStore::new());
        let sweeper = if config.sweep_enabled {
            Some(spawn_sweep_task(
                Arc::downgrade(&store),
                config.sweep_interval,
                EngineKind::Ttl,
            )?)
        } else {
            None
        };

        debug!(
            "TTL cache created: timeout={:?}, sweep_enabled={}",
            config.timeout, config.sweep_enabled
        );

        Ok(Self {
            store,
            timeout: config.timeout,
            sweeper,
        })
    }

    // == Put With Timeout ==
    /// Stores a value that expires after `timeout` instead of the default.
    pub fn put_with_timeout(&self, key: K, value: V, timeout: Duration) {
        let entry = CacheEntry::new(value, timeout);
        self.store.entries.write().insert(key, entry);
    }

    // == Cleanup Expired ==
    /// Runs one sweep pass immediately. Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        self.store.sweep_expired()
    }

    /// Returns true while a background sweep task is attached.
    pub fn is_sweeping(&self) -> bool {
        self.sweeper
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl<K: CacheKey, V: CacheValue> Storage<K, V> for TtlCache<K, V> {
    fn get(&self, key: &K) -> Result<V> {
        let now = Instant::now();
        let entries = self.store.entries.read();

        match entries.get(key) {
            Some(entry) if !entry.is_expired_at(now) => Ok(entry.value.clone()),
            _ => Err(CacheError::NotFound),
        }
    }

    fn put(&self, key: K, value: V) {
        self.put_with_timeout(key, value, self.timeout);
    }

    fn delete(&self, key: &K) {
        self.store.entries.write().remove(key);
    }

    fn drop_all(&self) {
        self.store.entries.write().clear();
    }

    fn len(&self) -> usize {
        self.store.entries.read().len()
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Ttl
    }
}
