//! Mock I2C bus for host tests

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::I2cInterface,
    Result,
};
use heapless::Vec;

/// One logged bus write: target address plus payload
pub type I2cWrite = (u8, Vec<u8, 8>);

/// Scripted I2C bus: tests declare which device addresses acknowledge and
/// inspect the write log afterwards.
#[derive(Debug, Default)]
pub struct MockI2c {
    present: Vec<u8, 4>,
    writes: Vec<I2cWrite, 64>,
    fail_next: Option<I2cError>,
}

impl MockI2c {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bus with the given device addresses present (others NACK).
    pub fn with_devices(addresses: &[u8]) -> Self {
        let mut bus = Self::default();
        for &addr in addresses {
            let _ = bus.present.push(addr);
        }
        bus
    }

    /// All writes seen so far, in order.
    pub fn writes(&self) -> &[I2cWrite] {
        &self.writes
    }

    /// Writes addressed to one device, in order.
    pub fn writes_to(&self, address: u8) -> impl Iterator<Item = &I2cWrite> {
        self.writes.iter().filter(move |(addr, _)| *addr == address)
    }

    /// Drop the write log.
    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    /// Make the next transfer fail with the given bus error.
    pub fn fail_next(&mut self, error: I2cError) {
        self.fail_next = Some(error);
    }

    fn take_fault(&mut self) -> Result<()> {
        match self.fail_next.take() {
            Some(error) => Err(PlatformError::I2c(error)),
            None => Ok(()),
        }
    }

    fn check_present(&self, address: u8) -> Result<()> {
        if self.present.contains(&address) {
            Ok(())
        } else {
            Err(PlatformError::I2c(I2cError::Nack))
        }
    }
}

impl I2cInterface for MockI2c {
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<()> {
        self.take_fault()?;
        self.check_present(address)?;
        let mut payload = Vec::new();
        for &byte in bytes {
            let _ = payload.push(byte);
        }
        let _ = self.writes.push((address, payload));
        Ok(())
    }

    fn write_read(&mut self, address: u8, _bytes: &[u8], buffer: &mut [u8]) -> Result<()> {
        self.take_fault()?;
        self.check_present(address)?;
        buffer.fill(0);
        Ok(())
    }
}
