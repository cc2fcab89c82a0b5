//! Cache Module
//!
//! Provides a bounded in-memory cache with per-entry TTL, lazy expiry on
//! access and eager expiry by a background sweeper.

use std::time::Duration;

mod entry;
mod stats;
mod store;
mod ttl_cache;


// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use ttl_cache::TtlCache;

// == Public Constants ==
/// Period of the background sweeper.
///
/// Expired entries stay physically present for less than this long. Shorter
/// periods cost more lock traffic.
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(1);
