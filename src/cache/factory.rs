//! Engine Factory
//!
//! Sole supplier of engine instances: turns a settings record into exactly
//! one boxed engine.

use tracing::info;

use crate::cache::{CacheKey, CacheValue, GrowthCache, LruCache, Storage, TtlCache};
use crate::config::{CacheConfig, EngineKind};
use crate::error::Result;

/// Builds the engine named by `config.engine`.
///
/// Engines with sweeping enabled start their sweep task here, which requires
/// a running tokio runtime; the LRU engine never sweeps.
///
/// # Example
/// ```
/// use polycache::{new_cache, CacheConfig, Storage};
///
/// let config = CacheConfig::builder().lru(3).build();
/// let cache = new_cache::<u32, String>(&config).unwrap();
/// cache.put(1, "dog".to_string());
/// assert_eq!(cache.get(&1).unwrap(), "dog");
/// ```
pub fn new_cache<K: CacheKey, V: CacheValue>(
    config: &CacheConfig,
) -> Result<Box<dyn Storage<K, V>>> {
    config.validate()?;

    let cache: Box<dyn Storage<K, V>> = match config.engine {
        EngineKind::Lru => Box::new(LruCache::<K, V>::new(config)?),
        EngineKind::GrowthOptimized => Box::new(GrowthCache::<K, V>::new(config)?),
        EngineKind::Ttl => Box::new(TtlCache::<K, V>::new(config)?),
    };

    info!("Created {} cache", config.engine);
    Ok(cache)
}
