//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the engine invariants against a simple model.

use proptest::prelude::*;
use std::collections::{HashMap, HashSet, VecDeque};
use std::time::Duration;

use crate::cache::{GrowthCache, LruCache, Storage, TtlCache};
use crate::config::CacheConfig;
use crate::error::CacheError;

// == Strategies ==
/// Small key space so operations collide often
fn key_strategy() -> impl Strategy<Value = u8> {
    0u8..16
}

fn value_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: u8, value: String },
    Get { key: u8 },
    Delete { key: u8 },
    Drop,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), value_strategy())
            .prop_map(|(key, value)| CacheOp::Put { key, value }),
        3 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        2 => key_strategy().prop_map(|key| CacheOp::Delete { key }),
        1 => Just(CacheOp::Drop),
    ]
}

/// Reference LRU: front = most recently used.
struct ModelLru {
    capacity: usize,
    order: VecDeque<u8>,
    values: HashMap<u8, String>,
}

impl ModelLru {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            order: VecDeque::new(),
            values: HashMap::new(),
        }
    }

    fn touch(&mut self, key: u8) {
        self.order.retain(|k| *k != key);
        self.order.push_front(key);
    }

    fn put(&mut self, key: u8, value: String) {
        self.values.insert(key, value);
        self.touch(key);
        if self.values.len() > self.capacity {
            if let Some(oldest) = self.order.pop_back() {
                self.values.remove(&oldest);
            }
        }
    }

    fn get(&mut self, key: u8) -> Option<String> {
        let value = self.values.get(&key).cloned()?;
        self.touch(key);
        Some(value)
    }

    fn delete(&mut self, key: u8) {
        self.values.remove(&key);
        self.order.retain(|k| *k != key);
    }

    fn drop_all(&mut self) {
        self.values.clear();
        self.order.clear();
    }
}

fn unswept_config() -> CacheConfig {
    CacheConfig::builder()
        .timeout(Duration::from_secs(3600))
        .sweep_disabled()
        .build()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    // Bijection, recency order and capacity bound hold after every step.
    #[test]
    fn prop_lru_matches_model(
        capacity in 2usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..80)
    ) {
        let cache = LruCache::<u8, String>::with_capacity(capacity);
        let mut model = ModelLru::new(capacity);

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    cache.put(key, value.clone());
                    model.put(key, value);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key).ok(), model.get(key));
                }
                CacheOp::Delete { key } => {
                    cache.delete(&key);
                    model.delete(key);
                }
                CacheOp::Drop => {
                    cache.drop_all();
                    model.drop_all();
                }
            }

            let order = cache.keys_by_recency();
            let unique: HashSet<u8> = order.iter().copied().collect();
            prop_assert_eq!(unique.len(), order.len(), "duplicate node in list");
            prop_assert_eq!(order.len(), cache.len(), "list and map disagree");
            prop_assert!(cache.len() <= capacity, "capacity exceeded");
            prop_assert_eq!(order, model.order.iter().copied().collect::<Vec<_>>());
        }
    }

    // Touching the oldest key makes the second-oldest the eviction victim.
    #[test]
    fn prop_lru_access_protects_from_eviction(capacity in 2usize..16) {
        let cache = LruCache::<usize, usize>::with_capacity(capacity);
        for key in 1..=capacity {
            cache.put(key, key);
        }

        prop_assert!(cache.get(&1).is_ok());
        cache.put(capacity + 1, capacity + 1);

        prop_assert_eq!(cache.get(&2), Err(CacheError::NotFound));
        prop_assert!(cache.get(&1).is_ok());
        prop_assert!(cache.get(&(capacity + 1)).is_ok());
        prop_assert_eq!(cache.len(), capacity);
    }

    // Deleting an absent key leaves every engine unchanged.
    #[test]
    fn prop_delete_absent_is_noop(
        entries in prop::collection::hash_map(key_strategy(), value_strategy(), 0..10),
        absent in 100u8..=255
    ) {
        let config = unswept_config();
        let engines: Vec<Box<dyn Storage<u8, String>>> = vec![
            Box::new(TtlCache::<u8, String>::new(&config).unwrap()),
            Box::new(LruCache::<u8, String>::with_capacity(32)),
            Box::new(GrowthCache::<u8, String>::new(&config).unwrap()),
        ];

        for cache in engines {
            for (key, value) in &entries {
                cache.put(*key, value.clone());
            }
            cache.delete(&absent);

            prop_assert_eq!(cache.len(), entries.len());
            for (key, value) in &entries {
                prop_assert_eq!(&cache.get(key).unwrap(), value);
            }
        }
    }

    // After drop_all nothing previously inserted is visible.
    #[test]
    fn prop_drop_clears_fully(
        entries in prop::collection::vec((key_strategy(), value_strategy()), 1..30)
    ) {
        let config = unswept_config();
        let engines: Vec<Box<dyn Storage<u8, String>>> = vec![
            Box::new(TtlCache::<u8, String>::new(&config).unwrap()),
            Box::new(LruCache::<u8, String>::with_capacity(4)),
            Box::new(GrowthCache::<u8, String>::new(&config).unwrap()),
        ];

        for cache in engines {
            for (key, value) in &entries {
                cache.put(*key, value.clone());
            }
            cache.drop_all();

            prop_assert!(cache.is_empty());
            for (key, _) in &entries {
                prop_assert_eq!(cache.get(key), Err(CacheError::NotFound));
            }
        }
    }

    // The last write to a key is the one read back.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        first in value_strategy(),
        second in value_strategy()
    ) {
        let config = unswept_config();
        let engines: Vec<Box<dyn Storage<u8, String>>> = vec![
            Box::new(TtlCache::<u8, String>::new(&config).unwrap()),
            Box::new(LruCache::<u8, String>::with_capacity(2)),
            Box::new(GrowthCache::<u8, String>::new(&config).unwrap()),
        ];

        for cache in engines {
            cache.put(key, first.clone());
            cache.put(key, second.clone());

            prop_assert_eq!(cache.get(&key).unwrap(), second.clone());
            prop_assert_eq!(cache.len(), 1);
        }
    }
}

// Separate proptest block with fewer cases for time-sensitive TTL tests
proptest! {
    #![proptest_config(ProptestConfig::with_cases(5))]

    #[test]
    fn prop_ttl_expiration_behavior(key in key_strategy(), value in value_strategy()) {
        let cache = TtlCache::<u8, String>::new(&unswept_config()).unwrap();

        cache.put_with_timeout(key, value.clone(), Duration::from_millis(30));
        prop_assert_eq!(cache.get(&key).unwrap(), value);

        std::thread::sleep(Duration::from_millis(40));
        prop_assert_eq!(cache.get(&key), Err(CacheError::NotFound));
    }
}
