//! Local temperature and humidity sensing.

pub mod sht31;

use crate::error::FetchError;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use sht31::Sht31;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Degrees Celsius.
    pub temperature: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
}

/// Anything that can produce a temperature and humidity reading.
pub trait Hygrometer: Send + 'static {
    fn read(&mut self) -> Result<Reading, FetchError>;
}

impl<I2C, D> Hygrometer for Sht31<I2C, D>
where
    I2C: I2c + Send + 'static,
    D: DelayNs + Send + 'static,
{
    fn read(&mut self) -> Result<Reading, FetchError> {
        self.measure()
            .map_err(|e| FetchError::Sensor(e.to_string()))
    }
}

/// Opens an SHT31 on a Linux I2C character device.
#[cfg(target_os = "linux")]
pub fn open_sht31(
    bus: &str,
    address: u8,
) -> Result<Sht31<linux_embedded_hal::I2cdev, linux_embedded_hal::Delay>, FetchError> {
    let i2c = linux_embedded_hal::I2cdev::new(bus)
        .map_err(|e| FetchError::Sensor(format!("cannot open {}: {}", bus, e)))?;
    log::info!("Opened SHT31 on {} at {:#04x}", bus, address);
    Ok(Sht31::new(i2c, linux_embedded_hal::Delay, address))
}
