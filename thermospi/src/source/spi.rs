//! SPI temperature source for the MSP430 sensor board.
//!
//! The device reports the temperature as a single 16-bit word, most
//! significant byte first, holding the current temperature in Celsius
//! multiplied by ten. Reading two bytes from the spidev character device
//! performs one half-duplex transfer.

use std::fs::{File, OpenOptions};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::error::SourceError;
use super::TemperatureSource;

/// Size of one temperature word on the bus.
const WORD_LEN: usize = 2;

/// Temperature source backed by an spidev character device.
///
/// The device handle is opened once at construction and released when the
/// source is dropped. The blocking transfer runs on the blocking thread
/// pool so acquisitions do not stall the async runtime.
#[derive(Debug)]
pub struct SpiTemperatureSource {
    device: Arc<Mutex<File>>,
    path: PathBuf,
    name: String,
}

impl SpiTemperatureSource {
    /// Opens the SPI character device at `path`.
    ///
    /// Failure here is a construction error: the service must not start
    /// without a readable device.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SourceError> {
        let path = path.as_ref().to_path_buf();
        let device = OpenOptions::new()
            .read(true)
            .open(&path)
            .map_err(|e| SourceError::Open {
                path: path.clone(),
                source: e,
            })?;

        let name = path.display().to_string();

        Ok(Self {
            device: Arc::new(Mutex::new(device)),
            path,
            name,
        })
    }

    /// Performs one blocking transfer and decodes the word.
    fn read_word(device: &Mutex<File>, path: &Path) -> Result<f64, SourceError> {
        let mut rx = [0u8; WORD_LEN];
        let got = {
            let mut device = device.lock().unwrap_or_else(|e| e.into_inner());
            device.read(&mut rx).map_err(|e| SourceError::Read {
                path: path.to_path_buf(),
                source: e,
            })?
        };

        if got < WORD_LEN {
            return Err(SourceError::ShortRead {
                path: path.to_path_buf(),
                got,
            });
        }

        Ok(decode_word(rx))
    }
}

impl TemperatureSource for SpiTemperatureSource {
    async fn degs_c(&self) -> Result<f64, SourceError> {
        let device = Arc::clone(&self.device);
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || Self::read_word(&device, &path))
            .await
            .map_err(|e| SourceError::Read {
                path: self.path.clone(),
                source: std::io::Error::other(format!("transfer task panicked: {e}")),
            })?
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Decodes one big-endian word of tenths of a degree Celsius.
fn decode_word(rx: [u8; WORD_LEN]) -> f64 {
    let temp_x10 = u16::from_be_bytes(rx);
    f64::from(temp_x10) / 10.0
}
