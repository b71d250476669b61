//! ThermoSPI - temperature service for an MSP430-powered SPI sensor
//!
//! This library reads a temperature sensor over an SPI character device and
//! makes the latest reading available to concurrent consumers without
//! blocking them on the (slow, occasionally failing) bus transfer.
//!
//! # Architecture
//!
//! - [`source`] - the [`source::TemperatureSource`] trait and the SPI
//!   implementation. The cache is generic over the trait so it can be
//!   driven by a stub in tests.
//! - [`cache`] - the core: a [`cache::TemperatureCache`] that owns a
//!   background refresh task polling the source on a fixed interval and
//!   publishing [`cache::Snapshot`]s through a single-writer/multi-reader
//!   handle.
//! - [`http`] - the read-only `GET /temperature` endpoint serving the
//!   current snapshot as JSON.
//! - [`csv`] - a direct-polling consumer that prints one CSV line per
//!   sample, bypassing the cache.
//!
//! # Example
//!
//! ```ignore
//! use thermospi::cache::{CacheConfig, TemperatureCache};
//! use thermospi::source::SpiTemperatureSource;
//!
//! let source = SpiTemperatureSource::open("/dev/spidev0.1")?;
//! let cache = TemperatureCache::spawn(source, CacheConfig::default())?;
//!
//! // Readers never touch the bus; they get the latest snapshot by value.
//! let snapshot = cache.current();
//! if let Some(reading) = snapshot.reading {
//!     println!("{:.1} degrees C at {}", reading.degs_c, reading.read_time);
//! }
//!
//! cache.close().await?;
//! ```

pub mod cache;
pub mod config;
pub mod csv;
pub mod http;
pub mod logging;
pub mod source;

/// Version of the thermospi library and CLI.
///
/// Synchronized across the workspace; injected from `Cargo.toml` at
/// compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
