//! Print command - CSV samples straight from the device.
//!
//! Polls the SPI device directly rather than going through the cache:
//! every line is a fresh sample at the requested cadence, and the first
//! acquisition error stops the run with a non-zero exit.

use std::time::Duration;

use clap::Args;
use tokio_util::sync::CancellationToken;

use thermospi::config::{DEFAULT_DEVICE_PATH, DEFAULT_PRINT_INTERVAL_SECS};
use thermospi::csv::run_csv;
use thermospi::logging::{init_logging, DEFAULT_LOG_DIR, DEFAULT_LOG_FILE};
use thermospi::source::SpiTemperatureSource;

use crate::error::CliError;

/// Arguments for the print command.
#[derive(Debug, Args)]
pub struct PrintArgs {
    /// Frequency of readings in seconds.
    #[arg(long, default_value_t = DEFAULT_PRINT_INTERVAL_SECS)]
    pub frequency: u64,

    /// SPI device to read from.
    #[arg(long, default_value = DEFAULT_DEVICE_PATH)]
    pub device: String,
}

/// Runs the CSV poll loop until ctrl-c or the first error.
pub async fn run(args: PrintArgs) -> Result<(), CliError> {
    if args.frequency == 0 {
        return Err(CliError::Config(
            "frequency must be greater than zero".to_string(),
        ));
    }

    // Stdout carries the CSV stream; logs go to the file only.
    let _logging =
        init_logging(DEFAULT_LOG_DIR, DEFAULT_LOG_FILE, false).map_err(CliError::LoggingInit)?;

    let source = SpiTemperatureSource::open(&args.device).map_err(CliError::Source)?;

    let shutdown = CancellationToken::new();
    let signal_shutdown = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal_shutdown.cancel();
        }
    });

    let mut out = std::io::stdout();
    run_csv(
        &source,
        Duration::from_secs(args.frequency),
        &mut out,
        &shutdown,
    )
    .await
    .map_err(CliError::Print)
}
