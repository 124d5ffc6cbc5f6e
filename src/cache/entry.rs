//! Cache Entry Module
//!
//! Defines the unit stored by the TTL and growth-optimized engines.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A stored value together with its absolute expiry instant.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The stored value
    pub value: V,
    /// Expiry instant, None = never expires
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry that expires `timeout` from now.
    ///
    /// A timeout too large to represent (such as `NEVER_EXPIRE`) yields an
    /// entry that never expires.
    pub fn new(value: V, timeout: Duration) -> Self {
        Self::expiring_at(value, Instant::now().checked_add(timeout))
    }

    /// Creates an entry with a precomputed expiry instant.
    pub fn expiring_at(value: V, expires_at: Option<Instant>) -> Self {
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is expired once the current time is
    /// greater than or equal to its expiry instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Same as [`is_expired`](Self::is_expired) against a caller-supplied clock
    /// reading, so a sweep pass can use one `now` for every entry.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => now >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining lifetime, or None if the entry never expires.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry is still live
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}
