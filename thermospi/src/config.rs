//! Service-level defaults shared by the CLI commands.

/// Default SPI character device for the MSP430 sensor board.
pub const DEFAULT_DEVICE_PATH: &str = "/dev/spidev0.1";

/// Default cache refresh interval for `serve`, in seconds.
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

/// Default sample interval for `print`, in seconds.
pub const DEFAULT_PRINT_INTERVAL_SECS: u64 = 1;

/// Default listen address for the HTTP endpoint.
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8080";
