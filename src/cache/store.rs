//! Cache Store Module
//!
//! Bounded HashMap storage with per-entry TTL. The store itself is not
//! synchronized; [`TtlCache`](crate::cache::TtlCache) wraps it in a lock and
//! passes the current instant into every call.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats};
use crate::error::{CacheError, ConfigError, Result};

// == Cache Store ==
/// Bounded key/value storage where every entry lives for a fixed TTL.
#[derive(Debug)]
pub struct CacheStore<K, V> {
    /// Key-value storage
    entries: HashMap<K, CacheEntry<V>>,
    /// Activity counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// Lifetime of an entry from its last insert or update
    ttl: Duration,
}

impl<K, V> CacheStore<K, V>
where
    K: Eq + Hash,
{
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity and entry TTL.
    ///
    /// # Errors
    /// Returns `ConfigError::ZeroCapacity` or `ConfigError::ZeroTtl` if either
    /// parameter is zero.
    pub fn new(max_size: usize, ttl: Duration) -> std::result::Result<Self, ConfigError> {
        if max_size == 0 {
            return Err(ConfigError::ZeroCapacity);
        }
        if ttl.is_zero() {
            return Err(ConfigError::ZeroTtl);
        }

        Ok(Self {
            entries: HashMap::new(),
            stats: CacheStats::new(),
            max_size,
            ttl,
        })
    }

    // == Add ==
    /// Inserts or updates `key`, giving it a fresh TTL starting at `now`.
    ///
    /// An existing key is always overwritten, even if it is already expired
    /// but not yet swept. A new key is rejected with `CacheError::Full` when
    /// the store is at capacity; nothing else is evicted to make room.
    pub fn add(&mut self, key: K, value: V, now: Instant) -> Result<()> {
        if let Some(entry) = self.entries.get_mut(&key) {
            *entry = CacheEntry::new(value, now, self.ttl);
            return Ok(());
        }

        if self.entries.len() >= self.max_size {
            self.stats.record_rejection();
            warn!(max_size = self.max_size, "Cache full, rejecting new key");
            return Err(CacheError::Full);
        }

        self.entries.insert(key, CacheEntry::new(value, now, self.ttl));
        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Get ==
    /// Returns the value stored under `key` if it is still live at `now`.
    ///
    /// An expired entry is removed as part of the call. A live entry is left
    /// in place, so it can be read again until it expires or is overwritten.
    pub fn get<Q>(&mut self, key: &Q, now: Instant) -> Result<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Err(err) = self.evict_if_expired(key, now) {
            self.stats.record_miss();
            return Err(err);
        }

        match self.entries.get(key) {
            Some(entry) => {
                self.stats.record_hit();
                Ok(Arc::clone(&entry.value))
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound)
            }
        }
    }

    // == Take ==
    /// Like [`get`](Self::get), but removes the entry on success.
    pub fn take<Q>(&mut self, key: &Q, now: Instant) -> Result<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        if let Err(err) = self.evict_if_expired(key, now) {
            self.stats.record_miss();
            return Err(err);
        }

        match self.entries.remove(key) {
            Some(entry) => {
                self.stats.record_hit();
                self.stats.set_total_entries(self.entries.len());
                Ok(entry.value)
            }
            None => {
                self.stats.record_miss();
                Err(CacheError::NotFound)
            }
        }
    }

    // == Contains ==
    /// Returns true if `key` is present and live at `now`.
    ///
    /// Shares the lazy-removal behavior of [`get`](Self::get).
    pub fn contains<Q>(&mut self, key: &Q, now: Instant) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.evict_if_expired(key, now).is_ok()
    }

    // == Is Full ==
    /// Returns true if no new key can currently be added.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.max_size
    }

    // == Clear ==
    /// Removes every entry, live or not.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.stats.set_total_entries(0);
    }

    // == Purge Expired ==
    /// Removes all entries expired at `now`.
    ///
    /// Returns the number of entries removed.
    pub fn purge_expired(&mut self, now: Instant) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired_at(now));
        let removed = before - self.entries.len();

        self.stats.record_swept(removed);
        self.stats.set_total_entries(self.entries.len());
        removed
    }

    // == Length ==
    /// Returns the number of physically present entries, including expired
    /// entries that have not been swept or touched yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // == Max Size ==
    /// Returns the configured capacity.
    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == TTL ==
    /// Returns the lifetime given to each entry on insert or update.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // == Stats ==
    /// Returns a snapshot of the current statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    /// Removes `key` if it is expired at `now`.
    ///
    /// Returns `Ok` only when a live entry is present.
    fn evict_if_expired<Q>(&mut self, key: &Q, now: Instant) -> Result<()>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.entries.get(key).map(|entry| entry.is_expired_at(now)) {
            None => Err(CacheError::NotFound),
            Some(false) => Ok(()),
            Some(true) => {
                self.entries.remove(key);
                self.stats.record_expired();
                self.stats.set_total_entries(self.entries.len());
                debug!("Removed expired entry on access");
                Err(CacheError::Expired)
            }
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    const TTL: Duration = Duration::from_secs(5);

    fn secs(n: u64) -> Duration {
        Duration::from_secs(n)
    }

    fn store(max_size: usize) -> CacheStore<String, String> {
        CacheStore::new(max_size, TTL).unwrap()
    }

    #[test]
    fn test_store_new() {
        let store = store(100);
        assert_eq!(store.len(), 0);
        assert!(store.is_empty());
        assert_eq!(store.max_size(), 100);
        assert_eq!(store.ttl(), TTL);
    }

    #[test]
    fn test_store_huge_capacity_does_not_preallocate() {
        let mut store = CacheStore::<String, String>::new(usize::MAX, TTL).unwrap();
        let now = Instant::now();

        store.add("k".to_string(), "v".to_string(), now).unwrap();
        assert_eq!(store.len(), 1);
        assert!(!store.is_full());
    }

    #[test]
    fn test_store_max_ttl_never_expires() {
        let mut store = CacheStore::<String, String>::new(4, Duration::MAX).unwrap();
        let t0 = Instant::now();

        store.add("k".to_string(), "v".to_string(), t0).unwrap();
        store.add("k".to_string(), "v2".to_string(), t0).unwrap();

        let much_later = t0 + Duration::from_secs(86_400 * 365 * 100);
        assert_eq!(*store.get("k", much_later).unwrap(), "v2");
        assert_eq!(store.purge_expired(much_later), 0);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_rejects_zero_capacity() {
        let result = CacheStore::<String, String>::new(0, TTL);
        assert_eq!(result.unwrap_err(), ConfigError::ZeroCapacity);
    }

    #[test]
    fn test_store_rejects_zero_ttl() {
        let result = CacheStore::<String, String>::new(10, Duration::ZERO);
        assert_eq!(result.unwrap_err(), ConfigError::ZeroTtl);
    }

    #[test]
    fn test_store_add_and_get() {
        let mut store = store(100);
        let now = Instant::now();

        store.add("key1".to_string(), "value1".to_string(), now).unwrap();
        let value = store.get("key1", now).unwrap();

        assert_eq!(*value, "value1");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_does_not_consume() {
        let mut store = store(100);
        let now = Instant::now();

        store.add("key1".to_string(), "value1".to_string(), now).unwrap();
        assert!(store.get("key1", now).is_ok());
        assert!(store.get("key1", now + secs(1)).is_ok());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_get_nonexistent() {
        let mut store = store(100);

        let result = store.get("nonexistent", Instant::now());
        assert_eq!(result.unwrap_err(), CacheError::NotFound);
    }

    #[test]
    fn test_store_full_rejects_new_key() {
        let mut store = store(2);
        let now = Instant::now();

        store.add("a".to_string(), "1".to_string(), now).unwrap();
        store.add("b".to_string(), "2".to_string(), now).unwrap();
        assert!(store.is_full());

        let result = store.add("c".to_string(), "3".to_string(), now);
        assert_eq!(result.unwrap_err(), CacheError::Full);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("c", now).unwrap_err(), CacheError::NotFound);
        // Nothing was evicted to make room
        assert!(store.get("a", now).is_ok());
        assert!(store.get("b", now).is_ok());
        assert_eq!(store.stats().rejected, 1);
    }

    #[test]
    fn test_store_update_when_full() {
        let mut store = store(1);
        let now = Instant::now();

        store.add("k".to_string(), "v1".to_string(), now).unwrap();
        store.add("k".to_string(), "v2".to_string(), now).unwrap();

        assert_eq!(*store.get("k", now).unwrap(), "v2");
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_store_update_refreshes_ttl() {
        let mut store = store(10);
        let t0 = Instant::now();

        store.add("k".to_string(), "v1".to_string(), t0).unwrap();
        store.add("k".to_string(), "v2".to_string(), t0 + secs(4)).unwrap();

        // Would have expired at t0 + 5s without the update
        assert_eq!(*store.get("k", t0 + secs(8)).unwrap(), "v2");
        assert_eq!(
            store.get("k", t0 + secs(9)).unwrap_err(),
            CacheError::Expired
        );
    }

    #[test]
    fn test_store_add_revives_stale_key() {
        let mut store = store(1);
        let t0 = Instant::now();

        store.add("k".to_string(), "old".to_string(), t0).unwrap();
        // Expired but not swept: still counts against capacity
        assert!(store.is_full());
        store.add("k".to_string(), "new".to_string(), t0 + secs(10)).unwrap();

        assert_eq!(*store.get("k", t0 + secs(11)).unwrap(), "new");
    }

    #[test]
    fn test_store_ttl_expiration() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.add("key1".to_string(), "value1".to_string(), t0).unwrap();

        assert!(store.get("key1", t0 + Duration::from_millis(4999)).is_ok());

        let result = store.get("key1", t0 + TTL);
        assert_eq!(result.unwrap_err(), CacheError::Expired);
        assert_eq!(store.len(), 0);

        // Gone for good after the lazy removal
        let result = store.get("key1", t0 + TTL);
        assert_eq!(result.unwrap_err(), CacheError::NotFound);
    }

    #[test]
    fn test_store_contains() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.add("key1".to_string(), "value1".to_string(), t0).unwrap();

        assert!(store.contains("key1", t0));
        assert!(!store.contains("other", t0));
        assert!(!store.contains("key1", t0 + TTL));
        // The expired entry was removed by the check
        assert_eq!(store.len(), 0);
        assert_eq!(store.stats().expired, 1);
    }

    #[test]
    fn test_store_take() {
        let mut store = store(100);
        let now = Instant::now();

        store.add("key1".to_string(), "value1".to_string(), now).unwrap();

        assert_eq!(*store.take("key1", now).unwrap(), "value1");
        assert_eq!(store.take("key1", now).unwrap_err(), CacheError::NotFound);
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_take_expired() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.add("key1".to_string(), "value1".to_string(), t0).unwrap();

        assert_eq!(
            store.take("key1", t0 + secs(6)).unwrap_err(),
            CacheError::Expired
        );
        assert!(store.is_empty());
    }

    #[test]
    fn test_store_clear() {
        let mut store = store(100);
        let now = Instant::now();

        for i in 0..5 {
            store.add(format!("key{i}"), "v".to_string(), now).unwrap();
        }
        store.clear();
        store.clear();

        assert_eq!(store.len(), 0);
        for i in 0..5 {
            assert_eq!(
                store.get(format!("key{i}").as_str(), now).unwrap_err(),
                CacheError::NotFound
            );
        }
    }

    #[test]
    fn test_store_purge_expired() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.add("key1".to_string(), "value1".to_string(), t0).unwrap();
        store.add("key2".to_string(), "value2".to_string(), t0 + secs(3)).unwrap();

        let removed = store.purge_expired(t0 + TTL);
        assert_eq!(removed, 1);
        assert_eq!(store.len(), 1);
        assert!(store.get("key2", t0 + TTL).is_ok());
        assert_eq!(store.stats().swept, 1);
    }

    #[test]
    fn test_store_stats() {
        let mut store = store(100);
        let t0 = Instant::now();

        store.add("key1".to_string(), "value1".to_string(), t0).unwrap();
        store.get("key1", t0).unwrap(); // hit
        let _ = store.get("nonexistent", t0); // miss
        let _ = store.get("key1", t0 + TTL); // expired miss

        let stats = store.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 2);
        assert_eq!(stats.expired, 1);
        assert_eq!(stats.total_entries, 0);
    }

    #[test]
    fn test_capacity_scenario() {
        // max_size=3, ttl=5s
        let mut store = store(3);
        let t0 = Instant::now();

        for key in ["k1", "k2", "k3"] {
            store.add(key.to_string(), "v".to_string(), t0).unwrap();
        }
        assert_eq!(store.len(), 3);

        let result = store.add("k4".to_string(), "v".to_string(), t0);
        assert_eq!(result.unwrap_err(), CacheError::Full);
        assert_eq!(store.len(), 3);

        let later = t0 + secs(6);
        assert_eq!(store.get("k1", later).unwrap_err(), CacheError::Expired);
        assert_eq!(store.len(), 2);

        store.add("k4".to_string(), "v".to_string(), later).unwrap();
        assert_eq!(store.len(), 3);
    }
}
