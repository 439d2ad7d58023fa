//! Character LCD device communication over the I2C character device.

use crate::lcd::protocol;
use crate::{Error, Result, TextDisplay};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::os::unix::io::AsRawFd;
use std::time::Duration;
use tracing::{debug, info};

/// `ioctl` request selecting the slave address on an I2C character device.
const I2C_SLAVE: libc::c_ulong = 0x0703;

/// Settle time between bus writes. The HD44780 needs ~37us per instruction;
/// clear/home need more, so a conservative uniform delay keeps things simple.
const WRITE_DELAY: Duration = Duration::from_micros(100);

/// HD44780 character LCD behind a PCF8574 I2C backpack.
pub struct LcdDevice {
    bus: File,
    bus_path: String,
    addr: u16,
}

impl LcdDevice {
    /// Opens the I2C bus, selects the backpack address, and initializes the
    /// controller into 4-bit mode.
    pub fn open(bus_path: &str, addr: u16) -> Result<Self> {
        let bus = OpenOptions::new()
            .read(true)
            .write(true)
            .open(bus_path)
            .map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    Error::LcdNotFound(bus_path.to_string())
                } else {
                    Error::Io(e)
                }
            })?;

        // SAFETY: the fd is valid for the lifetime of `bus` and I2C_SLAVE only
        // reads the address argument.
        let rc = unsafe { libc::ioctl(bus.as_raw_fd(), I2C_SLAVE, addr as libc::c_ulong) };
        if rc < 0 {
            return Err(Error::I2c(format!(
                "selecting address 0x{addr:02X} on {bus_path}: {}",
                std::io::Error::last_os_error()
            )));
        }

        let mut device = Self {
            bus,
            bus_path: bus_path.to_string(),
            addr,
        };
        device.write_raw(&protocol::init_sequence())?;
        info!(bus = %device.bus_path, addr, "LCD initialized");
        Ok(device)
    }

    /// Writes raw backpack bytes one at a time with a settle delay.
    fn write_raw(&mut self, bytes: &[u8]) -> Result<()> {
        for &byte in bytes {
            self.bus
                .write_all(&[byte])
                .map_err(|e| Error::I2c(format!("write to {}: {e}", self.bus_path)))?;
            std::thread::sleep(WRITE_DELAY);
        }
        debug!(count = bytes.len(), "LCD bytes written");
        Ok(())
    }

    /// Returns the I2C address in use.
    pub fn addr(&self) -> u16 {
        self.addr
    }
}

impl TextDisplay for LcdDevice {
    fn write_lines(&mut self, top: &str, bottom: &str) -> Result<()> {
        self.write_raw(&protocol::encode_line(0, top))?;
        self.write_raw(&protocol::encode_line(1, bottom))?;
        Ok(())
    }
}
