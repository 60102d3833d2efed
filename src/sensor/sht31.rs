//! Sensirion SHT31-D temperature and humidity sensor.
//!
//! Single-shot, high-repeatability measurements without clock stretching.
//! Each 16-bit word from the sensor is followed by a CRC-8 byte.

use super::Reading;
use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;
use thiserror::Error;

/// Default address with the ADDR pin pulled low.
pub const DEFAULT_ADDRESS: u8 = 0x44;

const MEASURE_HIGH_REPEATABILITY: [u8; 2] = [0x24, 0x00];

/// Worst-case conversion time for high repeatability is 15.5 ms.
const MEASUREMENT_DELAY_MS: u32 = 16;

#[derive(Error, Debug)]
pub enum Sht31Error<E> {
    #[error("I2C bus error: {0:?}")]
    Bus(E),

    #[error("CRC mismatch in sensor response")]
    Crc,
}

pub struct Sht31<I2C, D> {
    i2c: I2C,
    delay: D,
    address: u8,
}

impl<I2C: I2c, D: DelayNs> Sht31<I2C, D> {
    pub fn new(i2c: I2C, delay: D, address: u8) -> Self {
        Self {
            i2c,
            delay,
            address,
        }
    }

    /// Triggers a measurement and waits for the result.
    pub fn measure(&mut self) -> Result<Reading, Sht31Error<I2C::Error>> {
        self.i2c
            .write(self.address, &MEASURE_HIGH_REPEATABILITY)
            .map_err(Sht31Error::Bus)?;
        self.delay.delay_ms(MEASUREMENT_DELAY_MS);

        let mut buf = [0u8; 6];
        self.i2c
            .read(self.address, &mut buf)
            .map_err(Sht31Error::Bus)?;

        let raw_temperature = checked_word(&buf[0..3])?;
        let raw_humidity = checked_word(&buf[3..6])?;

        Ok(Reading {
            temperature: -45.0 + 175.0 * f64::from(raw_temperature) / 65535.0,
            humidity: 100.0 * f64::from(raw_humidity) / 65535.0,
        })
    }

    pub fn release(self) -> (I2C, D) {
        (self.i2c, self.delay)
    }
}

fn checked_word<E>(chunk: &[u8]) -> Result<u16, Sht31Error<E>> {
    if crc8(&chunk[..2]) != chunk[2] {
        return Err(Sht31Error::Crc);
    }
    Ok(u16::from_be_bytes([chunk[0], chunk[1]]))
}

/// CRC-8, polynomial 0x31, initial value 0xFF.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc = 0xFFu8;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}

#[cfg(test)]
pub(crate) mod fake {
    use embedded_hal::delay::DelayNs;
    use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, Operation};

    /// Scripted bus: records writes and answers reads with `response`.
    #[derive(Default)]
    pub struct FakeI2c {
        pub writes: Vec<(u8, Vec<u8>)>,
        pub response: Vec<u8>,
        pub fail: bool,
    }

    impl FakeI2c {
        pub fn answering(response: Vec<u8>) -> Self {
            Self {
                response,
                ..Self::default()
            }
        }
    }

    impl ErrorType for FakeI2c {
        type Error = ErrorKind;
    }

    impl I2c for FakeI2c {
        fn transaction(
            &mut self,
            address: u8,
            operations: &mut [Operation<'_>],
        ) -> Result<(), Self::Error> {
            if self.fail {
                return Err(ErrorKind::Other);
            }
            for op in operations {
                match op {
                    Operation::Write(bytes) => self.writes.push((address, bytes.to_vec())),
                    Operation::Read(buf) => {
                        let n = buf.len().min(self.response.len());
                        buf[..n].copy_from_slice(&self.response[..n]);
                    }
                }
            }
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct NoDelay {
        pub total_ns: u64,
    }

    impl DelayNs for NoDelay {
        fn delay_ns(&mut self, ns: u32) {
            self.total_ns += u64::from(ns);
        }
    }

    /// Encodes raw words the way the sensor sends them.
    pub fn frame(raw_temperature: u16, raw_humidity: u16) -> Vec<u8> {
        let mut out = Vec::with_capacity(6);
        for word in [raw_temperature, raw_humidity] {
            let bytes = word.to_be_bytes();
            out.extend_from_slice(&bytes);
            out.push(super::crc8(&bytes));
        }
        out
    }
}
