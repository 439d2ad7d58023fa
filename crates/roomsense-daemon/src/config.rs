//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Scheduling mode
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Sampler task configuration
    #[serde(default)]
    pub sampler: SamplerConfig,

    /// Publisher task configuration
    #[serde(default)]
    pub publisher: PublisherConfig,

    /// Blink task configuration
    #[serde(default)]
    pub blink: BlinkConfig,

    /// Hardware device configuration
    #[serde(default)]
    pub devices: DevicesConfig,
}

/// Scheduling mode selection.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SchedulerMode {
    /// Independent periodic tasks (blink, sampler, publisher).
    #[default]
    Tasks,
    /// One sequential loop with elapsed-time checks.
    Superloop,
}

/// Scheduler configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SchedulerConfig {
    /// Scheduling mode ("tasks" or "superloop")
    #[serde(default)]
    pub mode: SchedulerMode,
}

/// Sampler configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Sampling period in milliseconds
    #[serde(default = "default_sampler_period")]
    pub period_ms: u64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            period_ms: default_sampler_period(),
        }
    }
}

/// Publisher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Publish period in milliseconds
    #[serde(default = "default_publisher_period")]
    pub period_ms: u64,

    /// Telemetry endpoint URL (http only)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            period_ms: default_publisher_period(),
            endpoint: default_endpoint(),
        }
    }
}

/// Blink configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlinkConfig {
    /// Toggle period in milliseconds (per phase)
    #[serde(default = "default_blink_period")]
    pub period_ms: u64,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            period_ms: default_blink_period(),
        }
    }
}

/// Hardware device configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DevicesConfig {
    /// GPIO line of the status LED
    #[serde(default = "default_led_gpio")]
    pub led_gpio: u32,

    /// GPIO line of the PIR motion detector
    #[serde(default = "default_pir_gpio")]
    pub pir_gpio: u32,

    /// IIO device directory of the climate sensor
    #[serde(default = "default_climate_device")]
    pub climate_device: String,

    /// I2C bus character device of the LCD backpack
    #[serde(default = "default_lcd_bus")]
    pub lcd_bus: String,

    /// I2C address of the LCD backpack
    #[serde(default = "default_lcd_addr")]
    pub lcd_addr: u16,
}

impl Default for DevicesConfig {
    fn default() -> Self {
        Self {
            led_gpio: default_led_gpio(),
            pir_gpio: default_pir_gpio(),
            climate_device: default_climate_device(),
            lcd_bus: default_lcd_bus(),
            lcd_addr: default_lcd_addr(),
        }
    }
}

// Default value functions
fn default_sampler_period() -> u64 {
    2000
}

fn default_publisher_period() -> u64 {
    5000
}

fn default_blink_period() -> u64 {
    1000
}

fn default_endpoint() -> String {
    "http://127.0.0.1:3000/api/sensors".to_string()
}

fn default_led_gpio() -> u32 {
    17
}

fn default_pir_gpio() -> u32 {
    27
}

fn default_climate_device() -> String {
    "/sys/bus/iio/devices/iio:device0".to_string()
}

fn default_lcd_bus() -> String {
    "/dev/i2c-1".to_string()
}

fn default_lcd_addr() -> u16 {
    roomsense_hw::LCD_DEFAULT_ADDR
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        let config: Config = toml::from_str(&content).context("Failed to parse configuration")?;
        Ok(config)
    }

    /// Saves configuration to a TOML file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        std::fs::write(path.as_ref(), content).context("Failed to write configuration file")?;
        Ok(())
    }
}
