//! Sensor sampler.
//!
//! On each period: read the PIR and the climate sensor, fold the results into
//! the shared record (climate failures keep the previous values), and refresh
//! the LCD. All device errors are logged and never propagate out of the loop.

use crate::state::SharedSensorState;
use roomsense_hw::{ClimateReading, ClimateSensor, MotionSensor, TextDisplay};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Reads the climate sensor, mapping a failure to `None` with a warning.
pub fn read_climate<C: ClimateSensor>(climate: &mut C) -> Option<ClimateReading> {
    match climate.read() {
        Ok(reading) => Some(reading),
        Err(e) => {
            warn!("Climate sensor error: {}", e);
            None
        }
    }
}

/// Formats the two LCD rows for one sample.
pub fn display_lines(motion: bool, climate: Option<&ClimateReading>) -> (String, String) {
    let top = format!("M:{}", if motion { "Detected" } else { "Not Detected" });
    let bottom = match climate {
        Some(reading) => format!("T:{:.1}C H:{:.1}%", reading.temperature, reading.humidity),
        None => "Sensor Error".to_string(),
    };
    (top, bottom)
}

/// Writes one sample to the LCD; write errors are logged only.
pub fn render_display<D: TextDisplay>(
    display: &mut D,
    motion: bool,
    climate: Option<&ClimateReading>,
) {
    let (top, bottom) = display_lines(motion, climate);
    if let Err(e) = display.write_lines(&top, &bottom) {
        warn!("Display error: {}", e);
    }
}

/// Runs a single sampler cycle.
///
/// A failed PIR read skips the whole cycle (the record stays at the previous
/// completed sample); a failed climate read updates only the motion flag.
pub fn sample_once<M, C, D>(state: &SharedSensorState, pir: &mut M, climate: &mut C, display: &mut D)
where
    M: MotionSensor,
    C: ClimateSensor,
    D: TextDisplay,
{
    let motion = match pir.motion() {
        Ok(level) => level,
        Err(e) => {
            warn!("Motion sensor error: {}", e);
            return;
        }
    };

    let reading = read_climate(climate);
    state.update(reading, motion);
    render_display(display, motion, reading.as_ref());

    match reading {
        Some(r) => info!(
            motion,
            temperature = r.temperature,
            humidity = r.humidity,
            "sampled"
        ),
        None => info!(motion, "sampled (climate unavailable)"),
    }
}

/// Periodic sampler task.
pub async fn sampler_loop<M, C, D>(
    state: Arc<SharedSensorState>,
    mut pir: M,
    mut climate: C,
    mut display: D,
    period: Duration,
) where
    M: MotionSensor,
    C: ClimateSensor,
    D: TextDisplay,
{
    loop {
        sample_once(&state, &mut pir, &mut climate, &mut display);
        tokio::time::sleep(period).await;
    }
}
