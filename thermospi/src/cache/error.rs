//! Error types for the cache lifecycle.

use thiserror::Error;

/// Errors reported by [`TemperatureCache`](super::TemperatureCache).
#[derive(Debug, Error)]
pub enum CacheError {
    /// `close()` was called on a cache that is already closed.
    #[error("temperature cache is already closed")]
    AlreadyClosed,

    /// The poll interval must be greater than zero.
    #[error("poll interval must be greater than zero")]
    InvalidInterval,
}
