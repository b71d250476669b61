//! ThermoSPI CLI - temperature service for an MSP430 SPI sensor.
//!
//! Two commands: `serve` exposes the current temperature as JSON over
//! HTTP, backed by the background-refresh cache; `print` samples the
//! device directly and streams CSV to stdout.

mod commands;
mod error;

use clap::{Parser, Subcommand};

use commands::print::PrintArgs;
use commands::serve::ServeArgs;

#[derive(Parser)]
#[command(name = "thermospi")]
#[command(about = "Temperature service for an MSP430 SPI sensor", version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the current temperature as JSON at /temperature.
    Serve(ServeArgs),
    /// Print temperature samples to stdout in CSV format.
    Print(PrintArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Serve(args) => commands::serve::run(args).await,
        Command::Print(args) => commands::print::run(args).await,
    };

    if let Err(e) = result {
        e.exit();
    }
}
