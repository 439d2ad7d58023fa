//! Roomsense Hardware Library
//!
//! Provides hardware access for roomsense sensor nodes: sysfs GPIO pins for the
//! status LED and the PIR motion detector, a Linux IIO temperature/humidity
//! sensor, and an HD44780 character LCD behind an I2C PCF8574 backpack.
//!
//! Every device implements one of the traits below so the daemon's loops can be
//! exercised against mock hardware.

pub mod climate;
pub mod error;
pub mod gpio;
pub mod lcd;

pub use climate::{ClimateReading, IioClimateSensor};
pub use error::{Error, Result};
pub use gpio::{InputPin, OutputPin};
pub use lcd::LcdDevice;

/// Character LCD dimensions
pub const LCD_COLS: usize = 16;
pub const LCD_ROWS: usize = 2;

/// Default I2C address of the PCF8574 LCD backpack
pub const LCD_DEFAULT_ADDR: u16 = 0x27;

/// A digital motion detector (PIR).
pub trait MotionSensor: Send {
    /// Reads the current pin level. `true` means motion detected.
    fn motion(&mut self) -> Result<bool>;
}

/// A combined temperature/humidity sensor.
pub trait ClimateSensor: Send {
    /// Reads one temperature/humidity pair.
    fn read(&mut self) -> Result<ClimateReading>;
}

/// A single on/off indicator LED.
pub trait StatusLed: Send {
    /// Drives the LED high or low.
    fn set(&mut self, on: bool) -> Result<()>;
}

/// A two-row text display.
pub trait TextDisplay: Send {
    /// Writes both rows. Lines are padded or truncated to the display width.
    fn write_lines(&mut self, top: &str, bottom: &str) -> Result<()>;
}

/// A display may be absent (headless node); `None` swallows writes.
impl<D: TextDisplay> TextDisplay for Option<D> {
    fn write_lines(&mut self, top: &str, bottom: &str) -> Result<()> {
        match self {
            Some(display) => display.write_lines(top, bottom),
            None => Ok(()),
        }
    }
}
