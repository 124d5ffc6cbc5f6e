//! Polycache - In-process generic key-value cache
//!
//! Provides three interchangeable engines behind the [`Storage`] contract:
//! a TTL map, a bounded LRU and a growth-optimized concurrent map.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{new_cache, GrowthCache, LruCache, Storage, TtlCache};
pub use config::{CacheBuilder, CacheConfig, EngineKind, DEFAULT_EXPIRE, NEVER_EXPIRE};
pub use error::{CacheError, Result};
