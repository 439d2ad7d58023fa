//! Shared sensor state.
//!
//! One record written by the sampler and read by the publisher. The mutex is
//! held only for the three-field copy in either direction, so a reader always
//! observes a pair of climate values produced by a single sampler cycle.

use roomsense_hw::ClimateReading;
use std::sync::Mutex;

/// The latest sensor values. Zero-valued until the first sample.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorSnapshot {
    /// Degrees Celsius, last successfully read value.
    pub temperature: f64,
    /// Relative humidity percent, last successfully read value.
    pub humidity: f64,
    /// PIR level from the most recent completed sample.
    pub motion: bool,
}

/// Lock-guarded shared record.
pub struct SharedSensorState {
    inner: Mutex<SensorSnapshot>,
}

impl SharedSensorState {
    /// Creates the record with zero-valued fields.
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(SensorSnapshot::default()),
        }
    }

    /// Applies one sampler cycle.
    ///
    /// Temperature and humidity are overwritten only when the climate read
    /// succeeded; on failure the previous values stay (stale-value rule). The
    /// motion flag is overwritten unconditionally.
    pub fn update(&self, climate: Option<ClimateReading>, motion: bool) {
        let mut record = self.inner.lock().unwrap();
        if let Some(reading) = climate {
            record.temperature = reading.temperature;
            record.humidity = reading.humidity;
        }
        record.motion = motion;
    }

    /// Copies the record out under the lock.
    pub fn snapshot(&self) -> SensorSnapshot {
        *self.inner.lock().unwrap()
    }
}

impl Default for SharedSensorState {
    fn default() -> Self {
        Self::new()
    }
}
