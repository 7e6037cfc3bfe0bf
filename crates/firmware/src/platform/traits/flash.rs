//! Flash interface trait
//!
//! This module defines the Flash storage interface that platform
//! implementations must provide. Flash backs the non-volatile shutter
//! configuration.

use crate::platform::Result;

/// Flash interface trait
///
/// # Flash Characteristics
///
/// - Flash is organized in blocks (4 KB on RP2040)
/// - Erase operations set all bytes to 0xFF
/// - Write operations can only change bits from 1 to 0, so a block must be
///   erased before it is rewritten
/// - Erase and write are blocking and can take tens of milliseconds
///
/// # Safety Invariants
///
/// - Only one owner per Flash instance
/// - Must not erase or write the firmware region; implementations validate
///   addresses
pub trait FlashInterface {
    /// Read `buf.len()` bytes starting at `address`
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if the
    /// range is out of bounds, `FlashError::ReadFailed` on a read fault.
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()>;

    /// Write `data` starting at `address`
    ///
    /// The target region must have been erased first.
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` if the
    /// range is outside the writable region, `FlashError::WriteFailed` on a
    /// write fault.
    fn write(&mut self, address: u32, data: &[u8]) -> Result<()>;

    /// Erase `size` bytes starting at `address`
    ///
    /// Both must be multiples of [`FlashInterface::block_size`].
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Flash(FlashError::InvalidAddress)` for
    /// unaligned or out-of-range arguments, `FlashError::EraseFailed` on an
    /// erase fault.
    fn erase(&mut self, address: u32, size: u32) -> Result<()>;

    /// Minimum erasable unit size (4096 bytes on RP2040)
    fn block_size(&self) -> u32;

    /// Total Flash capacity in bytes
    fn capacity(&self) -> u32;
}
