//! Expiry Sweeper Task
//!
//! Background task that periodically removes expired cache entries.

use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{oneshot, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::cache::CacheStore;

/// Spawns a background task that periodically purges expired entries.
///
/// Each cycle sleeps for `interval`, then takes the write lock, reads the
/// clock and removes every entry expired at that instant. An entry may
/// therefore stay physically present for up to one `interval` after it
/// expires.
///
/// The task exits when `shutdown_rx` fires or its sender is dropped.
///
/// # Arguments
/// * `store` - shared reference to the cache store
/// * `interval` - time between sweep cycles
/// * `shutdown_rx` - stop signal
pub fn spawn_sweeper<K, V>(
    store: Arc<RwLock<CacheStore<K, V>>>,
    interval: Duration,
    mut shutdown_rx: oneshot::Receiver<()>,
) -> JoinHandle<()>
where
    K: Eq + Hash + Send + Sync + 'static,
    V: Send + Sync + 'static,
{
    tokio::spawn(async move {
        info!(interval_ms = interval.as_millis() as u64, "Starting expiry sweeper");

        loop {
            tokio::select! {
                _ = &mut shutdown_rx => {
                    info!("Expiry sweeper stopped");
                    break;
                }
                () = tokio::time::sleep(interval) => {}
            }

            let removed = {
                let mut store_guard = store.write().await;
                store_guard.purge_expired(Instant::now())
            };

            if removed > 0 {
                debug!(removed, "Sweep removed expired entries");
            }
        }
    })
}
