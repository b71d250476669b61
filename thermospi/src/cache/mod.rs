//! Background-refresh temperature cache.
//!
//! A [`TemperatureCache`] owns a single mutable "latest value" slot,
//! updates it on a fixed schedule from an injected
//! [`TemperatureSource`](crate::source::TemperatureSource), and serves
//! consistent snapshots to any number of concurrent readers.
//!
//! # Design Notes
//!
//! The refresh task is the only writer and readers go through a shared
//! `RwLock` handle, so reads never block on the bus. Shutdown is signalled
//! through a `CancellationToken`; [`TemperatureCache::close`] cancels the
//! token, joins the task, and reports [`CacheError::AlreadyClosed`] on a
//! repeat call instead of trapping. The last snapshot stays readable after
//! close.

mod error;
mod refresher;
mod snapshot;

pub use error::CacheError;
pub use snapshot::{Reading, Snapshot};

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::warn;

use crate::source::TemperatureSource;
use refresher::{Refresher, SharedSnapshot};

/// Default refresh interval, matching the serve command default.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Configuration for the cache's refresh loop.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How often the refresher polls the source. Must be greater than
    /// zero.
    pub poll_interval: Duration,

    /// Upper bound on a single acquisition attempt. A stuck transfer is
    /// abandoned at this bound so it cannot starve later ticks; keeping
    /// it at or below the poll interval preserves the schedule.
    pub acquire_timeout: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            acquire_timeout: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl CacheConfig {
    /// Creates a config with the specified poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Creates a config with the specified acquisition bound.
    pub fn with_acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    fn validate(&self) -> Result<(), CacheError> {
        if self.poll_interval.is_zero() {
            return Err(CacheError::InvalidInterval);
        }
        Ok(())
    }
}

/// Background-refresh cache for the latest temperature reading.
///
/// Constructed with [`spawn`](Self::spawn), which starts the refresh task
/// immediately; the cache stays live until [`close`](Self::close).
#[derive(Debug)]
pub struct TemperatureCache {
    snapshot: SharedSnapshot,
    shutdown: CancellationToken,
    refresher: Mutex<Option<JoinHandle<()>>>,
}

impl TemperatureCache {
    /// Validates `config`, takes ownership of `source`, and spawns the
    /// refresh loop. Must be called from within a tokio runtime.
    pub fn spawn<S>(source: S, config: CacheConfig) -> Result<Self, CacheError>
    where
        S: TemperatureSource + 'static,
    {
        config.validate()?;

        let snapshot = SharedSnapshot::default();
        let shutdown = CancellationToken::new();

        let refresher = Refresher::new(source, Arc::clone(&snapshot), config);
        let task = tokio::spawn(refresher.run(shutdown.clone()));

        Ok(Self {
            snapshot,
            shutdown,
            refresher: Mutex::new(Some(task)),
        })
    }

    /// Returns the latest snapshot by value.
    ///
    /// Never blocks on the source and is safe to call from any number of
    /// tasks while the refresher is writing. After [`close`](Self::close)
    /// it keeps returning the frozen last snapshot.
    pub fn current(&self) -> Snapshot {
        self.snapshot
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Stops the refresh loop and waits for it to exit.
    ///
    /// An in-flight acquisition finishes (or hits its timeout) before the
    /// task exits; readers are unaffected. A second call returns
    /// [`CacheError::AlreadyClosed`].
    pub async fn close(&self) -> Result<(), CacheError> {
        let task = self
            .refresher
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
            .ok_or(CacheError::AlreadyClosed)?;

        self.shutdown.cancel();
        if let Err(e) = task.await {
            warn!(error = %e, "temperature refresher did not exit cleanly");
        }
        Ok(())
    }
}

impl Drop for TemperatureCache {
    fn drop(&mut self) {
        // Stop the refresh loop even when the cache is dropped without
        // close().
        self.shutdown.cancel();
    }
}
