//! Expiry Sweep Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Weak;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::config::EngineKind;
use crate::error::{CacheError, Result};

/// Storage that can purge its own expired entries.
pub trait Sweep: Send + Sync + 'static {
    /// Removes expired entries and returns how many were removed.
    fn sweep_expired(&self) -> usize;
}

// == Sweep Handle ==
/// Owns a running sweep task and aborts it when dropped.
#[derive(Debug)]
pub struct SweepHandle {
    handle: JoinHandle<()>,
}

impl SweepHandle {
    /// Returns true once the task has stopped.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// Spawns a background task that periodically sweeps expired entries.
///
/// The task sleeps for `interval` between passes. It only holds a weak
/// reference to the store and exits on its own once the store is gone;
/// dropping the returned handle stops it immediately.
///
/// Fails with [`CacheError::RuntimeUnavailable`] when called outside a
/// tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(TtlStore::new());
/// let sweeper = spawn_sweep_task(Arc::downgrade(&store), Duration::from_secs(1), EngineKind::Ttl)?;
/// // Dropping the handle stops the task:
/// drop(sweeper);
/// ```
pub fn spawn_sweep_task<S: Sweep>(
    target: Weak<S>,
    interval: Duration,
    engine: EngineKind,
) -> Result<SweepHandle> {
    let runtime = Handle::try_current().map_err(|_| CacheError::RuntimeUnavailable)?;

    let handle = runtime.spawn(async move {
        info!(
            "Starting {} sweep task with interval of {:?}",
            engine, interval
        );

        loop {
            tokio::time::sleep(interval).await;

            let Some(store) = target.upgrade() else {
                info!("{} cache dropped, stopping sweep task", engine);
                break;
            };
            let removed = store.sweep_expired();
            drop(store);

            if removed > 0 {
                info!("{} sweep: removed {} expired entries", engine, removed);
            } else {
                debug!("{} sweep: no expired entries found", engine);
            }
        }
    });

    Ok(SweepHandle { handle })
}
