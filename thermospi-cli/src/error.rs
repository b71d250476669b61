//! CLI error handling with user-facing messages.

use std::fmt;
use std::io;
use std::process;

use thermospi::cache::CacheError;
use thermospi::csv::CsvError;
use thermospi::source::SourceError;

/// CLI-specific errors with user-facing messages.
#[derive(Debug)]
pub enum CliError {
    /// Invalid flag value.
    Config(String),
    /// Failed to initialize logging.
    LoggingInit(io::Error),
    /// Failed to open the SPI device.
    Source(SourceError),
    /// Failed to bind the HTTP listener.
    Bind { addr: String, error: io::Error },
    /// Cache lifecycle fault.
    Cache(CacheError),
    /// The CSV poll loop stopped on an error.
    Print(CsvError),
    /// Failed waiting for the shutdown signal.
    Signal(io::Error),
}

impl CliError {
    /// Exits the process with an error message and code 1.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {self}");

        if let CliError::Source(SourceError::Open { .. }) = self {
            eprintln!();
            eprintln!("Check that:");
            eprintln!("  1. The SPI device path exists (ls /dev/spidev*)");
            eprintln!("  2. The spidev kernel module is loaded");
            eprintln!("  3. You have read permission on the device");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
            CliError::LoggingInit(e) => write!(f, "Failed to initialize logging: {}", e),
            CliError::Source(e) => write!(f, "Failed to open temperature source: {}", e),
            CliError::Bind { addr, error } => {
                write!(f, "Failed to listen on '{}': {}", addr, error)
            }
            CliError::Cache(e) => write!(f, "Cache error: {}", e),
            CliError::Print(e) => write!(f, "Sampling stopped: {}", e),
            CliError::Signal(e) => write!(f, "Failed to wait for shutdown signal: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::LoggingInit(e) => Some(e),
            CliError::Source(e) => Some(e),
            CliError::Bind { error, .. } => Some(error),
            CliError::Cache(e) => Some(e),
            CliError::Print(e) => Some(e),
            CliError::Signal(e) => Some(e),
            CliError::Config(_) => None,
        }
    }
}
