//! Cache Statistics Module
//!
//! Tracks lookup outcomes and the different ways entries leave the cache.

use serde::Serialize;

// == Cache Stats ==
/// Counters describing cache activity since construction.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups (`get`/`take`) that returned a live value
    pub hits: u64,
    /// Lookups that found nothing or found an expired entry
    pub misses: u64,
    /// Entries removed lazily because a lookup found them expired
    pub expired: u64,
    /// New-key inserts rejected with `Full`
    pub rejected: u64,
    /// Entries removed by the background sweeper
    pub swept: u64,
    /// Entries physically present, including not-yet-swept expired ones
    pub total_entries: usize,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    // == Record Expired ==
    /// Records an expired entry removed on access.
    pub fn record_expired(&mut self) {
        self.expired += 1;
    }

    // == Record Rejection ==
    /// Increments the counter of inserts rejected with `Full`.
    pub fn record_rejection(&mut self) {
        self.rejected += 1;
    }

    // == Record Swept ==
    /// Adds `count` entries removed by a sweep cycle.
    pub fn record_swept(&mut self, count: usize) {
        self.swept += count as u64;
    }

    // == Update Entry Count ==
    /// Updates the total entries count.
    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
