//! Linux IIO temperature/humidity sensor.
//!
//! The kernel dht11 driver (which also speaks DHT22) exposes readings under
//! `/sys/bus/iio/devices/iio:deviceN` as `in_temp_input` (milli-degrees
//! Celsius) and `in_humidityrelative_input` (milli-percent). A read can fail
//! transiently when the one-wire transfer is corrupted; the caller decides what
//! to do with the previous values.

use crate::{ClimateSensor, Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const TEMP_FILE: &str = "in_temp_input";
const HUMIDITY_FILE: &str = "in_humidityrelative_input";

/// One temperature/humidity pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClimateReading {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
}

/// Converts an IIO milli-unit text value to its base unit.
pub(crate) fn parse_milli(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map(|v| v / 1000.0)
        .map_err(|_| Error::InvalidReading(format!("IIO value {raw:?}")))
}

/// IIO-backed climate sensor.
pub struct IioClimateSensor {
    device_dir: PathBuf,
}

impl IioClimateSensor {
    /// Creates a sensor reading from the given IIO device directory.
    ///
    /// The directory is not probed here: a sensor that is not wired up yet
    /// simply fails each read, which the sampler treats as a transient error.
    pub fn new<P: AsRef<Path>>(device_dir: P) -> Self {
        Self {
            device_dir: device_dir.as_ref().to_path_buf(),
        }
    }

    /// Returns the device directory path.
    pub fn device_dir(&self) -> &Path {
        &self.device_dir
    }

    fn read_channel(&self, file: &str) -> Result<f64> {
        let path = self.device_dir.join(file);
        let raw = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::ClimateNotFound(self.device_dir.display().to_string())
            } else {
                Error::Io(e)
            }
        })?;
        parse_milli(&raw)
    }
}

impl ClimateSensor for IioClimateSensor {
    fn read(&mut self) -> Result<ClimateReading> {
        let temperature = self.read_channel(TEMP_FILE)?;
        let humidity = self.read_channel(HUMIDITY_FILE)?;
        debug!(temperature, humidity, "climate sensor read");
        Ok(ClimateReading {
            temperature,
            humidity,
        })
    }
}
