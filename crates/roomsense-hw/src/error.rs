//! Error types for the roomsense hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when interacting with the hardware.
#[derive(Error, Debug)]
pub enum Error {
    /// GPIO line could not be exported or opened.
    #[error("GPIO line {0} not found")]
    GpioNotFound(u32),

    /// GPIO value file held something other than 0 or 1.
    #[error("invalid GPIO value: {0}")]
    InvalidPinValue(String),

    /// Climate sensor device directory not found.
    #[error("climate sensor not found at {0}")]
    ClimateNotFound(String),

    /// Climate sensor returned text that does not parse as a reading.
    #[error("invalid climate reading: {0}")]
    InvalidReading(String),

    /// LCD I2C bus device not found or could not be opened.
    #[error("LCD bus not found at {0}")]
    LcdNotFound(String),

    /// I2C communication error.
    #[error("I2C error: {0}")]
    I2c(String),

    /// Underlying I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
