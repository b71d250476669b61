//! Background refresh loop.
//!
//! The refresher is the single writer of the shared snapshot. On each
//! tick of the interval timer it captures the current UTC instant, runs
//! one acquisition against the source under the configured timeout, and
//! publishes the outcome. Acquisition failures are recorded in the
//! snapshot and never stop the loop.

use std::sync::{Arc, RwLock};

use chrono::Utc;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::snapshot::{Reading, Snapshot};
use super::CacheConfig;
use crate::source::{SourceError, TemperatureSource};

/// Shared handle to the latest snapshot.
///
/// The refresher is the only writer; readers clone the snapshot under the
/// read lock and never block on the source.
pub(crate) type SharedSnapshot = Arc<RwLock<Snapshot>>;

/// The refresh loop task.
pub(crate) struct Refresher<S> {
    source: S,
    snapshot: SharedSnapshot,
    config: CacheConfig,
}

impl<S: TemperatureSource> Refresher<S> {
    pub(crate) fn new(source: S, snapshot: SharedSnapshot, config: CacheConfig) -> Self {
        Self {
            source,
            snapshot,
            config,
        }
    }

    /// Runs until the token is cancelled. The source is dropped (and with
    /// it the device handle released) when the loop exits.
    pub(crate) async fn run(self, shutdown: CancellationToken) {
        info!(
            source = self.source.name(),
            interval_ms = self.config.poll_interval.as_millis() as u64,
            "temperature refresher started"
        );

        let mut interval = tokio::time::interval(self.config.poll_interval);
        // A slow acquisition delays the next tick; it must not queue a
        // burst of catch-up ticks behind it.
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;

                _ = shutdown.cancelled() => {
                    info!("temperature refresher stopping");
                    break;
                }

                _ = interval.tick() => {
                    self.refresh_once().await;
                }
            }
        }

        debug!("temperature refresher stopped");
    }

    /// One tick: acquire under the timeout bound and publish the outcome.
    ///
    /// Awaited inline before the next tick is considered, so acquisitions
    /// from one loop instance never overlap. Dropping the acquisition
    /// future at the timeout is what abandons a stuck transfer.
    async fn refresh_once(&self) {
        let read_time = Utc::now();

        let outcome =
            match tokio::time::timeout(self.config.acquire_timeout, self.source.degs_c()).await {
                Ok(Ok(degs_c)) => Ok(Reading { degs_c, read_time }),
                Ok(Err(e)) => Err(e),
                Err(_) => Err(SourceError::Timeout {
                    limit: self.config.acquire_timeout,
                }),
            };

        publish(&self.snapshot, outcome);
    }
}

/// Applies one update to the snapshot.
///
/// A failed acquisition keeps the reading from the previous successful
/// tick alongside the error marker; a transient bus error must not erase
/// a still-useful last-known value. The marker clears on the next
/// success.
pub(crate) fn publish(snapshot: &SharedSnapshot, outcome: Result<Reading, SourceError>) {
    let mut guard = snapshot.write().unwrap_or_else(|e| e.into_inner());
    match outcome {
        Ok(reading) => {
            guard.reading = Some(reading);
            guard.error = None;
        }
        Err(e) => {
            warn!(error = %e, "temperature acquisition failed");
            guard.error = Some(e.to_string());
        }
    }
}
