//! LRU Cache Module
//!
//! Bounded cache that evicts the least recently used entry.
//!
//! Nodes live in a slot arena and link to each other by slot index, forming
//! a doubly-linked list where:
//! - Head = Most recently used
//! - Tail = Least recently used

use std::collections::HashMap;

use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{CacheKey, CacheValue, Storage};
use crate::config::{corrected_lru_capacity, CacheConfig, EngineKind};
use crate::error::{CacheError, Result};

// == LRU Node ==
#[derive(Debug)]
struct LruNode<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

// == LRU List ==
/// Map of key to slot plus the recency list threaded through the slots.
///
/// Invariants: every key in `index` owns exactly one occupied slot that is
/// reachable from `head`, and `head.is_none() == tail.is_none() == index.is_empty()`.
#[derive(Debug)]
struct LruList<K, V> {
    index: HashMap<K, usize>,
    slots: Vec<Option<LruNode<K, V>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: usize,
}

impl<K: CacheKey, V: CacheValue> LruList<K, V> {
    fn new(capacity: usize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity),
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            capacity,
        }
    }

    fn node(&self, slot: usize) -> &LruNode<K, V> {
        self.slots[slot]
            .as_ref()
            .expect("linked slot must be occupied")
    }

    fn node_mut(&mut self, slot: usize) -> &mut LruNode<K, V> {
        self.slots[slot]
            .as_mut()
            .expect("linked slot must be occupied")
    }

    fn alloc(&mut self, node: LruNode<K, V>) -> usize {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot] = Some(node);
                slot
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    // == Unlink ==
    /// Detaches a node, repairing its neighbours and the list endpoints.
    fn unlink(&mut self, slot: usize) {
        let (prev, next) = {
            let node = self.node(slot);
            (node.prev, node.next)
        };

        match prev {
            Some(p) => self.node_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.node_mut(n).prev = prev,
            None => self.tail = prev,
        }

        let node = self.node_mut(slot);
        node.prev = None;
        node.next = None;
    }

    // == Move To Front ==
    /// Makes the node the most recently used. Works for linked and freshly
    /// allocated (unlinked) nodes alike.
    fn move_to_front(&mut self, slot: usize) {
        if self.head == Some(slot) {
            return;
        }

        // Anything linked but not at the head has a predecessor
        if self.node(slot).prev.is_some() {
            self.unlink(slot);
        }

        let old_head = self.head;
        {
            let node = self.node_mut(slot);
            node.prev = None;
            node.next = old_head;
        }
        match old_head {
            Some(h) => self.node_mut(h).prev = Some(slot),
            None => self.tail = Some(slot),
        }
        self.head = Some(slot);
    }

    /// Unlinks and frees a slot, returning its node.
    fn remove_slot(&mut self, slot: usize) -> LruNode<K, V> {
        self.unlink(slot);
        let node = self.slots[slot]
            .take()
            .expect("linked slot must be occupied");
        self.free.push(slot);
        node
    }

    fn get(&mut self, key: &K) -> Option<V> {
        let slot = *self.index.get(key)?;
        self.move_to_front(slot);
        Some(self.node(slot).value.clone())
    }

    /// Inserts or updates, then evicts the tail if over capacity.
    /// Returns the evicted key, if any.
    fn put(&mut self, key: K, value: V) -> Option<K> {
        if let Some(&slot) = self.index.get(&key) {
            self.node_mut(slot).value = value;
            self.move_to_front(slot);
            return None;
        }

        let slot = self.alloc(LruNode {
            key: key.clone(),
            value,
            prev: None,
            next: None,
        });
        self.index.insert(key, slot);
        self.move_to_front(slot);

        if self.index.len() > self.capacity {
            return self.evict_tail();
        }
        None
    }

    // == Evict Tail ==
    fn evict_tail(&mut self) -> Option<K> {
        let tail = self.tail?;
        let node = self.remove_slot(tail);
        self.index.remove(&node.key);
        Some(node.key)
    }

    fn delete(&mut self, key: &K) {
        if let Some(slot) = self.index.remove(key) {
            self.remove_slot(slot);
        }
    }

    fn clear(&mut self) {
        self.index = HashMap::with_capacity(self.capacity);
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
    }

    /// Keys from most to least recently used.
    fn keys_by_recency(&self) -> Vec<K> {
        let mut keys = Vec::with_capacity(self.index.len());
        let mut cursor = self.head;
        while let Some(slot) = cursor {
            let node = self.node(slot);
            keys.push(node.key.clone());
            cursor = node.next;
        }
        keys
    }
}

// == LRU Cache ==
/// Keeps only the most recently used values, up to a fixed capacity.
#[derive(Debug)]
pub struct LruCache<K, V> {
    inner: Mutex<LruList<K, V>>,
    capacity: usize,
}

impl<K: CacheKey, V: CacheValue> LruCache<K, V> {
    // == Constructor ==
    /// Creates an LRU cache sized by `config.lru_capacity`; capacities below
    /// 2 fall back to the default. Timeout and sweep settings do not apply.
    pub fn new(config: &CacheConfig) -> Result<Self> {
        Ok(Self::with_capacity(config.lru_capacity))
    }

    /// Creates an LRU cache with the given capacity (below 2 falls back to the default).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = corrected_lru_capacity(capacity);
        debug!("LRU cache created: capacity={}", capacity);

        Self {
            inner: Mutex::new(LruList::new(capacity)),
            capacity,
        }
    }

    /// Maximum number of entries held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Keys ordered from most to least recently used.
    pub fn keys_by_recency(&self) -> Vec<K> {
        self.inner.lock().keys_by_recency()
    }
}

impl<K: CacheKey, V: CacheValue> Storage<K, V> for LruCache<K, V> {
    fn get(&self, key: &K) -> Result<V> {
        self.inner.lock().get(key).ok_or(CacheError::NotFound)
    }

    fn put(&self, key: K, value: V) {
        self.inner.lock().put(key, value);
    }

    fn delete(&self, key: &K) {
        self.inner.lock().delete(key);
    }

    fn drop_all(&self) {
        self.inner.lock().clear();
    }

    fn len(&self) -> usize {
        self.inner.lock().index.len()
    }

    fn kind(&self) -> EngineKind {
        EngineKind::Lru
    }
}
