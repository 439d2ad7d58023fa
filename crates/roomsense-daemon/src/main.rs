//! Roomsense Daemon
//!
//! Samples a PIR motion detector and a temperature/humidity sensor, drives a
//! status LED and a 16x2 LCD, and periodically POSTs a JSON telemetry payload
//! to an HTTP endpoint.

mod blink;
mod config;
mod http;
mod publisher;
mod sampler;
mod state;
mod superloop;
#[cfg(test)]
mod testutil;

use anyhow::{Context, Result};
use roomsense_hw::{IioClimateSensor, InputPin, LcdDevice, OutputPin};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use config::{Config, SchedulerMode};
use state::SharedSensorState;

#[tokio::main]
async fn main() -> Result<()> {
    // Setup logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config/default.toml".to_string());

    let config = Config::load(&config_path).context("Failed to load configuration")?;
    info!("Loaded configuration from: {}", config_path);

    let endpoint = http::parse_url(&config.publisher.endpoint)
        .context("Invalid telemetry endpoint URL")?;
    info!("Telemetry endpoint: {}", endpoint);

    // Open hardware
    let led = OutputPin::open(config.devices.led_gpio).context("Failed to open LED GPIO")?;
    let pir = InputPin::open(config.devices.pir_gpio).context("Failed to open PIR GPIO")?;
    let climate = IioClimateSensor::new(&config.devices.climate_device);

    // The LCD is optional; a node without one runs headless
    let display = match LcdDevice::open(&config.devices.lcd_bus, config.devices.lcd_addr) {
        Ok(device) => Some(device),
        Err(e) => {
            warn!("LCD not found: {}. Running headless.", e);
            None
        }
    };

    let state = Arc::new(SharedSensorState::new());

    let sample_period = Duration::from_millis(config.sampler.period_ms);
    let publish_period = Duration::from_millis(config.publisher.period_ms);
    let blink_period = Duration::from_millis(config.blink.period_ms);

    match config.scheduler.mode {
        SchedulerMode::Tasks => {
            info!("Scheduler: independent tasks");
            tokio::spawn(blink::blink_loop(led, blink_period));
            tokio::spawn(sampler::sampler_loop(
                state.clone(),
                pir,
                climate,
                display,
                sample_period,
            ));
            tokio::spawn(publisher::publisher_loop(
                state.clone(),
                endpoint,
                publish_period,
            ));
        }
        SchedulerMode::Superloop => {
            info!("Scheduler: superloop");
            tokio::spawn(superloop::superloop(
                state.clone(),
                pir,
                climate,
                led,
                display,
                endpoint,
                superloop::SuperloopPeriods {
                    sample: sample_period,
                    publish: publish_period,
                },
            ));
        }
    }

    // Setup Unix signal handlers
    let mut sigterm = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())?;
    let mut sigint = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::interrupt())?;

    tokio::select! {
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
    }

    Ok(())
}
