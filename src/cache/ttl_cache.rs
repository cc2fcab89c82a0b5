//! Shared TTL Cache Handle
//!
//! Wraps a [`CacheStore`] in a lock and owns the sweeper that keeps it clean.

use std::borrow::Borrow;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

use crate::cache::{CacheStats, CacheStore, SWEEP_INTERVAL};
use crate::error::{ConfigError, Result};
use crate::tasks::spawn_sweeper;

// == TTL Cache ==
/// A bounded, concurrent cache whose entries expire a fixed TTL after their
/// last insert or update.
///
/// Cloning is cheap and every clone refers to the same entries. Each
/// operation runs under the store's lock and reads the clock after acquiring
/// it, so operations are linearizable. Sequences of operations are not
/// atomic: [`is_full`](Self::is_full) followed by [`add`](Self::add) can
/// race with other callers, and `add` is the authoritative capacity check.
///
/// A background sweeper removes expired entries every [`SWEEP_INTERVAL`].
/// It runs until [`shutdown`](Self::shutdown) is called or the last clone is
/// dropped.
pub struct TtlCache<K, V> {
    store: Arc<RwLock<CacheStore<K, V>>>,
    sweeper: Arc<SweeperHandle>,
}

/// Stop channel and join handle of the sweeper task.
///
/// Dropping this drops the sender, which also ends the task.
struct SweeperHandle {
    shutdown_tx: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl<K, V> Clone for TtlCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            sweeper: Arc::clone(&self.sweeper),
        }
    }
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache holding at most `max_size` entries for `ttl` each and
    /// starts its sweeper.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if `max_size` or `ttl` is zero. No task is
    /// spawned in that case.
    pub fn new(max_size: usize, ttl: Duration) -> std::result::Result<Self, ConfigError> {
        let store = Arc::new(RwLock::new(CacheStore::new(max_size, ttl)?));

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = spawn_sweeper(Arc::clone(&store), SWEEP_INTERVAL, shutdown_rx);

        info!(max_size, ttl_secs = ttl.as_secs_f64(), "TTL cache created");

        Ok(Self {
            store,
            sweeper: Arc::new(SweeperHandle {
                shutdown_tx: Mutex::new(Some(shutdown_tx)),
                task: Mutex::new(Some(task)),
            }),
        })
    }

    // == Add ==
    /// Inserts `value` under `key`, or replaces the current value and resets
    /// its TTL if the key is already present.
    ///
    /// # Errors
    /// `CacheError::Full` if `key` is new and the cache is at capacity.
    pub async fn add(&self, key: K, value: V) -> Result<()> {
        let mut store = self.store.write().await;
        store.add(key, value, Instant::now())
    }

    // == Get ==
    /// Returns shared access to the value stored under `key`.
    ///
    /// The entry is not consumed. Use [`take`](Self::take) for single-use
    /// reads.
    ///
    /// # Errors
    /// `CacheError::NotFound` if absent, `CacheError::Expired` if present but
    /// stale (the entry is removed by this call).
    pub async fn get<Q>(&self, key: &Q) -> Result<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut store = self.store.write().await;
        store.get(key, Instant::now())
    }

    // == Take ==
    /// Like [`get`](Self::get), but removes the entry in the same critical
    /// section, so at most one caller ever receives a given value.
    pub async fn take<Q>(&self, key: &Q) -> Result<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut store = self.store.write().await;
        store.take(key, Instant::now())
    }

    // == Contains ==
    /// Returns true if `key` is present and not expired. A stale entry is
    /// removed, as with [`get`](Self::get).
    pub async fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let mut store = self.store.write().await;
        store.contains(key, Instant::now())
    }

    // == Is Full ==
    /// Returns true if the cache currently holds `max_size` entries.
    ///
    /// Advisory only: the answer may be stale by the time the caller acts on
    /// it.
    pub async fn is_full(&self) -> bool {
        self.store.read().await.is_full()
    }

    // == Length ==
    /// Returns the number of physically present entries. This includes
    /// expired entries not yet swept, so it is an upper bound on the number
    /// of live entries.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if no entries are physically present.
    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }

    // == Clear ==
    /// Removes every entry.
    pub async fn clear(&self) {
        self.store.write().await.clear();
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub async fn stats(&self) -> CacheStats {
        self.store.read().await.stats()
    }

    // == Max Size ==
    /// Returns the configured capacity.
    pub async fn max_size(&self) -> usize {
        self.store.read().await.max_size()
    }

    // == TTL ==
    /// Returns the lifetime given to each entry on insert or update.
    pub async fn ttl(&self) -> Duration {
        self.store.read().await.ttl()
    }

    // == Shutdown ==
    /// Stops the sweeper and waits for it to exit.
    ///
    /// Returns true for the call that actually stopped it and false for any
    /// later call, on this handle or a clone. The cache stays usable after
    /// shutdown; expired entries are then only removed lazily.
    pub async fn shutdown(&self) -> bool {
        let Some(shutdown_tx) = self.sweeper.shutdown_tx.lock().await.take() else {
            return false;
        };
        // The task may already be gone if the runtime is shutting down
        let _ = shutdown_tx.send(());

        let task = self.sweeper.task.lock().await.take();
        if let Some(task) = task {
            if let Err(err) = task.await {
                warn!(error = %err, "Expiry sweeper did not exit cleanly");
            }
        }

        info!("TTL cache sweeper shut down");
        true
    }

    // == Sweeper Running ==
    /// Returns true while the sweeper task is alive.
    pub async fn is_sweeper_running(&self) -> bool {
        self.sweeper
            .task
            .lock()
            .await
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }
}
