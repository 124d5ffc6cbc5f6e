//! Configuration Module
//!
//! Settings record consumed by the cache factory, the option builder that
//! produces it, and loaders for environment variables and JSON.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{CacheError, Result};

// == Public Constants ==
/// Timeout that never elapses.
pub const NEVER_EXPIRE: Duration = Duration::MAX;

/// Default entry lifetime (one hour).
pub const DEFAULT_EXPIRE: Duration = Duration::from_secs(60 * 60);

/// Default pause between sweep passes (fifteen minutes).
pub const DEFAULT_SWEEP_INTERVAL: Duration = Duration::from_secs(15 * 60);

/// Capacity used when an LRU size is missing or too small.
pub const DEFAULT_LRU_CAPACITY: usize = 500;

/// Smallest LRU capacity accepted as-is.
pub const MIN_LRU_CAPACITY: usize = 2;

// == Engine Kind ==
/// Storage engine selected by the factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineKind {
    /// Lock-guarded hash map with per-entry expiry
    #[default]
    Ttl,
    /// Bounded least-recently-used cache
    Lru,
    /// Concurrent map for write-once/read-many workloads
    #[serde(alias = "growth")]
    GrowthOptimized,
}

impl fmt::Display for EngineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EngineKind::Ttl => "ttl",
            EngineKind::Lru => "lru",
            EngineKind::GrowthOptimized => "growth",
        };
        f.write_str(name)
    }
}

impl FromStr for EngineKind {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ttl" | "map" => Ok(EngineKind::Ttl),
            "lru" => Ok(EngineKind::Lru),
            "growth" | "growth_optimized" | "read_optimized" => Ok(EngineKind::GrowthOptimized),
            other => Err(CacheError::InvalidConfig(format!(
                "unknown engine kind '{}'",
                other
            ))),
        }
    }
}

// == Cache Config ==
/// Settings consumed once by the factory when an engine is constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Lifetime given to entries written without an explicit timeout
    pub timeout: Duration,
    /// Pause between background sweep passes
    pub sweep_interval: Duration,
    /// Whether a background sweep task is started
    pub sweep_enabled: bool,
    /// Maximum number of entries held by the LRU engine
    pub lru_capacity: usize,
    /// Which engine the factory builds
    pub engine: EngineKind,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_EXPIRE,
            sweep_interval: DEFAULT_SWEEP_INTERVAL,
            sweep_enabled: true,
            lru_capacity: DEFAULT_LRU_CAPACITY,
            engine: EngineKind::Ttl,
        }
    }
}

impl CacheConfig {
    /// Starts a builder seeded with the defaults.
    pub fn builder() -> CacheBuilder {
        CacheBuilder::default()
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TIMEOUT_SECS` - Default entry lifetime (default: 3600)
    /// - `CACHE_SWEEP_INTERVAL_SECS` - Sweep frequency (default: 900)
    /// - `CACHE_SWEEP_ENABLED` - Run the background sweep (default: true)
    /// - `CACHE_ENGINE` - `ttl`, `lru` or `growth` (default: ttl)
    /// - `CACHE_LRU_CAPACITY` - LRU size, below 2 falls back to 500 (default: 500)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: env::var("CACHE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.timeout),
            sweep_interval: env::var("CACHE_SWEEP_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.sweep_interval),
            sweep_enabled: env::var("CACHE_SWEEP_ENABLED")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.sweep_enabled),
            lru_capacity: env::var("CACHE_LRU_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(corrected_lru_capacity)
                .unwrap_or(defaults.lru_capacity),
            engine: env::var("CACHE_ENGINE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.engine),
        }
    }

    /// Parses a config from JSON; missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self> {
        let mut config: Self = serde_json::from_str(input)
            .map_err(|e| CacheError::InvalidConfig(e.to_string()))?;
        config.lru_capacity = corrected_lru_capacity(config.lru_capacity);
        Ok(config)
    }

    /// Rejects settings no engine can run with.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_enabled && self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidConfig(
                "sweep interval must be greater than zero when sweeping is enabled".to_string(),
            ));
        }
        Ok(())
    }
}

/// Applies the LRU size floor: anything below 2 becomes the default.
pub fn corrected_lru_capacity(capacity: usize) -> usize {
    if capacity < MIN_LRU_CAPACITY {
        warn!(
            "LRU capacity {} is below {}, using {}",
            capacity, MIN_LRU_CAPACITY, DEFAULT_LRU_CAPACITY
        );
        DEFAULT_LRU_CAPACITY
    } else {
        capacity
    }
}

// == Cache Builder ==
/// Option-application layer producing a [`CacheConfig`].
///
/// The LRU and growth-optimized options are flags; when both are set the
/// LRU engine is chosen.
#[derive(Debug, Clone, Default)]
pub struct CacheBuilder {
    timeout: Option<Duration>,
    sweep_interval: Option<Duration>,
    sweep_disabled: bool,
    lru_capacity: Option<usize>,
    growth_optimized: bool,
}

impl CacheBuilder {
    /// Sets the default lifetime of entries.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the pause between sweep passes.
    pub fn sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = Some(interval);
        self
    }

    /// Turns off the background sweep.
    pub fn sweep_disabled(mut self) -> Self {
        self.sweep_disabled = true;
        self
    }

    /// Requests the LRU engine with the given capacity.
    pub fn lru(mut self, capacity: usize) -> Self {
        self.lru_capacity = Some(capacity);
        self
    }

    /// Requests the growth-optimized engine. Ignored if `lru` is also set.
    pub fn growth_optimized(mut self) -> Self {
        self.growth_optimized = true;
        self
    }

    /// Resolves the options into a settings record.
    pub fn build(self) -> CacheConfig {
        let defaults = CacheConfig::default();

        let engine = match (self.lru_capacity, self.growth_optimized) {
            (Some(_), true) => {
                warn!("Both LRU and growth-optimized requested, using LRU");
                EngineKind::Lru
            }
            (Some(_), false) => EngineKind::Lru,
            (None, true) => EngineKind::GrowthOptimized,
            (None, false) => EngineKind::Ttl,
        };

        CacheConfig {
            timeout: self.timeout.unwrap_or(defaults.timeout),
            sweep_interval: self.sweep_interval.unwrap_or(defaults.sweep_interval),
            sweep_enabled: !self.sweep_disabled,
            lru_capacity: self
                .lru_capacity
                .map(corrected_lru_capacity)
                .unwrap_or(defaults.lru_capacity),
            engine,
        }
    }
}
