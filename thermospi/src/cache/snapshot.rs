//! Snapshot types published by the temperature cache.

use chrono::{DateTime, Utc};

/// One decoded temperature reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius. The sensor reports tenths of a
    /// degree, so one decimal place of precision is meaningful.
    pub degs_c: f64,
    /// UTC instant captured when the acquisition began.
    pub read_time: DateTime<Utc>,
}

/// The externally visible state of the cache.
///
/// `Default` is the unpopulated state before the first refresh tick
/// lands. A failed acquisition keeps the reading from the previous
/// successful tick and sets `error`; the next successful acquisition
/// clears it again. Readers always receive a complete snapshot by value,
/// never a half-written pair.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// The most recent successful reading, if any tick has succeeded.
    pub reading: Option<Reading>,
    /// Rendered message of the most recent acquisition failure, cleared
    /// on the next success.
    pub error: Option<String>,
}

impl Snapshot {
    /// Returns `true` once at least one acquisition has succeeded.
    pub fn is_populated(&self) -> bool {
        self.reading.is_some()
    }

    /// Returns `true` if the most recent acquisition failed.
    pub fn has_error(&self) -> bool {
        self.error.is_some()
    }
}
