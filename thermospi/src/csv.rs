//! Direct-polling CSV consumer.
//!
//! Polls the source on its own schedule and writes one `time,temperature`
//! line per sample. This consumer does not go through the cache: each
//! line is a fresh acquisition, and the first failure ends the run — a
//! capture with silent gaps is worse than one that stops loudly. This is
//! the opposite of the cache's error-tolerant policy, on purpose.

use std::io::Write;
use std::time::Duration;

use chrono::{SecondsFormat, Utc};
use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::source::{SourceError, TemperatureSource};

/// Column header written before the first sample.
pub const CSV_HEADER: &str = "time,temperature";

/// Errors that end a CSV run.
#[derive(Debug, Error)]
pub enum CsvError {
    /// An acquisition failed; the run stops at the first failure.
    #[error(transparent)]
    Acquire(#[from] SourceError),

    /// The output writer failed.
    #[error("failed to write sample: {0}")]
    Write(#[from] std::io::Error),
}

/// Polls `source` every `interval` and writes one CSV line per sample.
///
/// Returns the first acquisition or write error, or `Ok(())` when
/// `shutdown` is cancelled. The timestamp on each line is captured when
/// that sample's acquisition began.
pub async fn run_csv<S, W>(
    source: &S,
    interval: Duration,
    out: &mut W,
    shutdown: &CancellationToken,
) -> Result<(), CsvError>
where
    S: TemperatureSource,
    W: Write,
{
    writeln!(out, "{CSV_HEADER}")?;
    out.flush()?;

    let mut ticks = tokio::time::interval(interval);
    ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;

            _ = shutdown.cancelled() => {
                debug!("csv poll loop stopping");
                return Ok(());
            }

            _ = ticks.tick() => {
                let now = Utc::now();
                let degs_c = source.degs_c().await?;
                writeln!(
                    out,
                    "{},{:.1}",
                    now.to_rfc3339_opts(SecondsFormat::Secs, true),
                    degs_c
                )?;
                out.flush()?;
            }
        }
    }
}
