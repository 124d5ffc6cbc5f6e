//! Polycache demo
//!
//! Builds a cache from environment configuration and walks through the
//! shared contract, logging each step.

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use polycache::{new_cache, CacheConfig, CacheError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "polycache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env();
    info!(
        "Configuration loaded: engine={}, timeout={:?}, sweep_interval={:?}, sweep_enabled={}, lru_capacity={}",
        config.engine,
        config.timeout,
        config.sweep_interval,
        config.sweep_enabled,
        config.lru_capacity
    );

    let cache = new_cache::<String, String>(&config).context("failed to build cache")?;

    for (key, value) in [("1", "dog"), ("2", "cat"), ("3", "mouse")] {
        cache.put(key.to_string(), value.to_string());
    }
    info!("Stored {} entries", cache.len());

    let key = "2".to_string();
    match cache.get(&key) {
        Ok(value) => info!("get({}) = {}", key, value),
        Err(CacheError::NotFound) => warn!("get({}) missed", key),
        Err(e) => return Err(e.into()),
    }

    cache.delete(&key);
    info!("After delete, get({}) found: {}", key, cache.get(&key).is_ok());

    cache.drop_all();
    info!("After drop, {} entries remain", cache.len());

    Ok(())
}
