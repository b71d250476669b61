//! Temperature source abstraction
//!
//! A [`TemperatureSource`] supplies one reading on demand and may fail
//! transiently (bus error, short transfer, timeout). The cache's refresh
//! loop and the CSV poller are generic over this trait, so tests run
//! against scripted stubs instead of real hardware.
//!
//! The only hardware implementation is [`SpiTemperatureSource`], which
//! reads the MSP430 sensor board through an spidev character device.

mod error;
mod spi;

pub use error::SourceError;
pub use spi::SpiTemperatureSource;

use std::future::Future;

/// Trait for temperature sources.
///
/// Implementations are not required to be safe for concurrent
/// acquisitions; the refresh loop is the only caller on the hot path and
/// issues one acquisition at a time.
pub trait TemperatureSource: Send + Sync {
    /// Acquires one temperature reading in degrees Celsius.
    fn degs_c(&self) -> impl Future<Output = Result<f64, SourceError>> + Send;

    /// Returns the source's name for logging (the device path for
    /// hardware sources).
    fn name(&self) -> &str;
}
