//! I2C interface trait
//!
//! This module defines the blocking I2C bus interface that platform
//! implementations must provide. Both actuator boards sit on one bus.

use crate::platform::Result;

/// I2C interface trait
///
/// # Safety Invariants
///
/// - I2C peripheral must be initialized before use
/// - Only one owner per bus instance; drivers sharing a bus go through
///   the same interface value
pub trait I2cInterface {
    /// Write bytes to a device
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c(I2cError::Nack)` if the device does not
    /// acknowledge its address, other `PlatformError::I2c` variants for bus
    /// faults.
    fn write(&mut self, address: u8, bytes: &[u8]) -> Result<()>;

    /// Write then read in one transaction (repeated start)
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::I2c` if either phase fails.
    fn write_read(&mut self, address: u8, bytes: &[u8], buffer: &mut [u8]) -> Result<()>;
}
