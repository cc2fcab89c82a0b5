//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

// == Cache Entry ==
/// Represents a single cache entry with its value and expiry instant.
#[derive(Debug)]
pub struct CacheEntry<V> {
    /// The stored value, shared with readers
    pub value: Arc<V>,
    /// Instant at which the entry stops being visible, None = a TTL too
    /// large for the clock to represent, so the entry never expires
    pub expires_at: Option<Instant>,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry that expires `ttl` after `now`.
    pub fn new(value: V, now: Instant, ttl: Duration) -> Self {
        Self {
            value: Arc::new(value),
            expires_at: now.checked_add(ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired at `now`.
    ///
    /// Boundary condition: an entry is expired once `now >= expires_at`, so the
    /// value is visible for strictly less than one full TTL. Both the lazy
    /// read path and the sweeper go through this predicate.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(expires) => expires <= now,
            None => false,
        }
    }
}
