//! Blocking I2C wrapper for Embassy-RP
//!
//! Both actuator boards are write-mostly register devices, so the blocking
//! bus API is sufficient and keeps the drivers free of async plumbing.

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::I2cInterface,
    Result,
};
use embassy_rp::i2c::{self, Blocking, I2c};

fn map_err(error: i2c::Error) -> PlatformError {
    match error {
        i2c::Error::Abort(i2c::AbortReason::NoAcknowledge) => PlatformError::I2c(I2cError::Nack),
        i2c::Error::Timeout => PlatformError::I2c(I2cError::Timeout),
        _ => PlatformError::I2c(I2cError::BusError),
    }
}

/// Embassy-RP blocking I2C wrapper
pub struct Rp2040I2c<'a, T: i2c::Instance> {
    i2c: I2c<'a, T, Blocking>,
}

impl<'a, T: i2c::Instance> Rp2040I2c<'a, T> {
    /// Wrap an already-configured blocking I2C bus.
    pub fn new(i2c: I2c<'a, T, Blocking>) -> Self {
        Self { i2c }
    }
}

impl<'a, T: i2c::Instance> I2cInterface for Rp2040I2c<'a, T> {
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<()> {
        self.i2c.blocking_write(address, bytes).map_err(map_err)
    }

    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<()> {
        self.i2c
            .blocking_write_read(address, bytes, buffer)
            .map_err(map_err)
    }
}
