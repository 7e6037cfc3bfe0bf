//! RP2040 Flash implementation
//!
//! Blocking Flash access through `embassy_rp::flash`. Used only for the
//! small configuration sector, so the blocking pauses are acceptable in
//! the main loop.
//!
//! # Flash Layout
//!
//! ```text
//! [Firmware]       0x000000 - 0x040000 (256 KB) - PROTECTED
//! [Config Sector]  0x040000 - 0x041000 (4 KB)
//! [Unused]         0x041000 - 0x200000
//! ```

use crate::platform::{
    error::{FlashError, PlatformError},
    traits::FlashInterface,
    Result,
};
use embassy_rp::flash::{Blocking, Flash};
use embassy_rp::peripherals::FLASH;

/// Total Flash capacity on the Pico (2 MB)
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Protected firmware region (first 256 KB)
const FIRMWARE_SIZE: u32 = 0x40000;

/// Flash block size (minimum erase unit)
const BLOCK_SIZE: u32 = 4096;

/// RP2040 Flash implementation
///
/// Addresses are offsets from the start of Flash. The firmware region is
/// protected from writes and erases.
pub struct Rp2040Flash<'a> {
    flash: Flash<'a, FLASH, Blocking, FLASH_SIZE>,
}

impl<'a> Rp2040Flash<'a> {
    pub fn new(flash: Flash<'a, FLASH, Blocking, FLASH_SIZE>) -> Self {
        Self { flash }
    }

    fn check_writable(&self, address: u32, len: u32) -> Result<()> {
        let end = address
            .checked_add(len)
            .ok_or(PlatformError::Flash(FlashError::InvalidAddress))?;
        if address < FIRMWARE_SIZE || end > FLASH_SIZE as u32 {
            return Err(PlatformError::Flash(FlashError::InvalidAddress));
        }
        Ok(())
    }
}

impl<'a> FlashInterface for Rp2040Flash<'a> {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        self.flash
            .blocking_read(address, buf)
            .map_err(|_| PlatformError::Flash(FlashError::ReadFailed))
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        self.check_writable(address, data.len() as u32)?;
        self.flash
            .blocking_write(address, data)
            .map_err(|_| PlatformError::Flash(FlashError::WriteFailed))
    }

    fn erase(&mut self, address: u32, size: u32) -> Result<()> {
        if address % BLOCK_SIZE != 0 || size % BLOCK_SIZE != 0 {
            return Err(PlatformError::Flash(FlashError::InvalidAddress));
        }
        self.check_writable(address, size)?;
        self.flash
            .blocking_erase(address, address + size)
            .map_err(|_| PlatformError::Flash(FlashError::EraseFailed))
    }

    fn block_size(&self) -> u32 {
        BLOCK_SIZE
    }

    fn capacity(&self) -> u32 {
        FLASH_SIZE as u32
    }
}
