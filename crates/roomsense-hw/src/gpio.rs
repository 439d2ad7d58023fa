//! Sysfs GPIO pins for the status LED and the PIR motion detector.
//!
//! Lines are exported through `/sys/class/gpio/export` on open and the
//! direction is set once; reads and writes go through the line's `value` file.

use crate::{Error, MotionSensor, Result, StatusLed};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

const GPIO_ROOT: &str = "/sys/class/gpio";

/// Exports a GPIO line and returns the path to its directory.
///
/// An already-exported line makes the export write fail with EBUSY; that is
/// fine as long as the line directory exists afterwards.
fn export(root: &str, line: u32) -> Result<PathBuf> {
    let line_dir = PathBuf::from(root).join(format!("gpio{line}"));
    if !line_dir.exists() {
        if let Err(e) = fs::write(PathBuf::from(root).join("export"), line.to_string()) {
            if e.raw_os_error() != Some(libc::EBUSY) && !line_dir.exists() {
                return Err(Error::GpioNotFound(line));
            }
        }
    }
    if !line_dir.exists() {
        return Err(Error::GpioNotFound(line));
    }
    Ok(line_dir)
}

/// Interprets the text content of a `value` file.
pub(crate) fn parse_pin_value(raw: &str) -> Result<bool> {
    match raw.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(Error::InvalidPinValue(other.to_string())),
    }
}

/// A GPIO output line (status LED).
pub struct OutputPin {
    line: u32,
    value_path: PathBuf,
}

impl OutputPin {
    /// Exports the line and configures it as an output.
    pub fn open(line: u32) -> Result<Self> {
        Self::open_at(GPIO_ROOT, line)
    }

    fn open_at(root: &str, line: u32) -> Result<Self> {
        let dir = export(root, line)?;
        fs::write(dir.join("direction"), "out").map_err(|_| Error::GpioNotFound(line))?;
        Ok(Self {
            line,
            value_path: dir.join("value"),
        })
    }

    /// Returns the line number.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl StatusLed for OutputPin {
    fn set(&mut self, on: bool) -> Result<()> {
        fs::write(&self.value_path, if on { "1" } else { "0" })?;
        debug!(line = self.line, on, "GPIO output written");
        Ok(())
    }
}

/// A GPIO input line (PIR motion detector).
pub struct InputPin {
    line: u32,
    value_path: PathBuf,
}

impl InputPin {
    /// Exports the line and configures it as an input.
    pub fn open(line: u32) -> Result<Self> {
        Self::open_at(GPIO_ROOT, line)
    }

    fn open_at(root: &str, line: u32) -> Result<Self> {
        let dir = export(root, line)?;
        fs::write(dir.join("direction"), "in").map_err(|_| Error::GpioNotFound(line))?;
        Ok(Self {
            line,
            value_path: dir.join("value"),
        })
    }

    /// Returns the line number.
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl MotionSensor for InputPin {
    fn motion(&mut self) -> Result<bool> {
        let raw = fs::read_to_string(&self.value_path)?;
        parse_pin_value(&raw)
    }
}
