//! Error types for temperature acquisition.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when acquiring a temperature reading.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The SPI device could not be opened. Fatal to startup.
    #[error("failed to open SPI device {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A bus transfer failed.
    #[error("failed to read from SPI device {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The transfer returned fewer bytes than one temperature word.
    #[error("short read from SPI device {path}: got {got} of 2 bytes")]
    ShortRead { path: PathBuf, got: usize },

    /// The acquisition exceeded the configured bound.
    #[error("acquisition timed out after {limit:?}")]
    Timeout { limit: Duration },
}
