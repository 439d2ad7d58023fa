//! HD44780 character LCD behind an I2C PCF8574 backpack.

pub mod device;
pub mod protocol;

pub use device::LcdDevice;
