//! Serve command - HTTP endpoint backed by the refresh cache.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use thermospi::cache::{CacheConfig, TemperatureCache};
use thermospi::config::{DEFAULT_DEVICE_PATH, DEFAULT_LISTEN_ADDR, DEFAULT_POLL_INTERVAL_SECS};
use thermospi::http;
use thermospi::logging::{init_logging, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
use thermospi::source::SpiTemperatureSource;

use crate::error::CliError;

/// Arguments for the serve command.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Address to listen on.
    #[arg(long = "http", default_value = DEFAULT_LISTEN_ADDR)]
    pub http: String,

    /// Interval to poll the sensor at, in seconds.
    #[arg(long, default_value_t = DEFAULT_POLL_INTERVAL_SECS)]
    pub interval: u64,

    /// SPI device to read from.
    #[arg(long, default_value = DEFAULT_DEVICE_PATH)]
    pub device: String,
}

/// Runs the HTTP service until ctrl-c.
pub async fn run(args: ServeArgs) -> Result<(), CliError> {
    if args.interval == 0 {
        return Err(CliError::Config(
            "interval must be greater than zero".to_string(),
        ));
    }

    let _logging =
        init_logging(DEFAULT_LOG_DIR, DEFAULT_LOG_FILE, true).map_err(CliError::LoggingInit)?;

    let source = SpiTemperatureSource::open(&args.device).map_err(CliError::Source)?;

    let interval = Duration::from_secs(args.interval);
    let config = CacheConfig::default()
        .with_poll_interval(interval)
        .with_acquire_timeout(interval);
    let cache = Arc::new(TemperatureCache::spawn(source, config).map_err(CliError::Cache)?);

    let listener = TcpListener::bind(&args.http)
        .await
        .map_err(|e| CliError::Bind {
            addr: args.http.clone(),
            error: e,
        })?;
    info!(addr = %args.http, "listening at /temperature");

    let shutdown = CancellationToken::new();
    let server = tokio::spawn(http::serve(listener, Arc::clone(&cache), shutdown.clone()));

    tokio::signal::ctrl_c().await.map_err(CliError::Signal)?;
    info!("shutdown signal received");

    shutdown.cancel();
    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "temperature endpoint exited with error"),
        Err(e) => warn!(error = %e, "temperature endpoint task did not exit cleanly"),
    }

    cache.close().await.map_err(CliError::Cache)
}
