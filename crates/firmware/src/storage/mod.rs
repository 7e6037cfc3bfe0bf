//! Non-volatile configuration storage
//!
//! Adapts a [`FlashInterface`] to the byte-offset `NvStorage` interface the
//! configuration store persists through. One flash sector holds the whole
//! configuration image; writes go through read-modify-erase-write so the
//! store can address any byte range.

use crate::platform::{traits::FlashInterface, PlatformError};
use pico_shutter_core::traits::{NvError, NvStorage};

/// Sector size reserved for configuration
const SECTOR_SIZE: usize = 4096;

/// Default sector base on the Pico: first sector past the firmware region
pub const CONFIG_SECTOR_BASE: u32 = 0x0004_0000;

/// Flash-backed non-volatile storage window
pub struct FlashNv<F> {
    flash: F,
    base: u32,
    // Sector image kept here so writes do not need a stack buffer
    shadow: [u8; SECTOR_SIZE],
}

impl<F: FlashInterface> FlashNv<F> {
    /// Create a storage window over one sector starting at `base`.
    pub fn new(flash: F, base: u32) -> Self {
        Self {
            flash,
            base,
            shadow: [0xFF; SECTOR_SIZE],
        }
    }

    fn check_range(offset: usize, len: usize) -> Result<(), NvError> {
        if offset + len > SECTOR_SIZE {
            return Err(NvError::OutOfBounds);
        }
        Ok(())
    }
}

fn read_error(_: PlatformError) -> NvError {
    NvError::ReadFailed
}

fn write_error(_: PlatformError) -> NvError {
    NvError::WriteFailed
}

impl<F: FlashInterface> NvStorage for FlashNv<F> {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), NvError> {
        Self::check_range(offset, buf.len())?;
        self.flash
            .read(self.base + offset as u32, buf)
            .map_err(read_error)
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), NvError> {
        Self::check_range(offset, data.len())?;
        self.flash
            .read(self.base, &mut self.shadow)
            .map_err(read_error)?;
        self.shadow[offset..offset + data.len()].copy_from_slice(data);
        self.flash
            .erase(self.base, SECTOR_SIZE as u32)
            .map_err(write_error)?;
        self.flash
            .write(self.base, &self.shadow)
            .map_err(write_error)
    }

    fn capacity(&self) -> usize {
        SECTOR_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockFlash;
    use pico_shutter_core::config::ConfigStore;

    #[test]
    fn test_write_read_round_trip() {
        let mut nv = FlashNv::new(MockFlash::new(), 0);
        nv.write(10, &[1, 2, 3]).unwrap();

        let mut buf = [0u8; 3];
        nv.read(10, &mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3]);
    }

    #[test]
    fn test_partial_write_preserves_surroundings() {
        let mut nv = FlashNv::new(MockFlash::new(), 0);
        nv.write(0, &[0xAA; 8]).unwrap();
        nv.write(2, &[0x00; 2]).unwrap();

        let mut buf = [0u8; 8];
        nv.read(0, &mut buf).unwrap();
        assert_eq!(buf, [0xAA, 0xAA, 0x00, 0x00, 0xAA, 0xAA, 0xAA, 0xAA]);
    }

    #[test]
    fn test_write_erases_before_programming() {
        let mut nv = FlashNv::new(MockFlash::new(), 0);
        // 0xFF -> 0x00 -> 0xFF needs a real erase under NOR semantics
        nv.write(0, &[0x00]).unwrap();
        nv.write(0, &[0xFF]).unwrap();

        let mut buf = [0u8; 1];
        nv.read(0, &mut buf).unwrap();
        assert_eq!(buf, [0xFF]);
        assert_eq!(nv.flash.erase_count, 2);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut nv = FlashNv::new(MockFlash::new(), 0);
        assert_eq!(nv.write(4090, &[0; 10]), Err(NvError::OutOfBounds));
        let mut buf = [0u8; 10];
        assert_eq!(nv.read(4090, &mut buf), Err(NvError::OutOfBounds));
    }

    #[test]
    fn test_config_store_persists_through_flash() {
        let mut nv = FlashNv::new(MockFlash::new(), 0);

        let mut store = ConfigStore::new();
        store.set(None, 2, 1, 150, 600, 1500, "Kitchen").unwrap();
        store.save(&mut nv).unwrap();

        let mut reloaded = ConfigStore::new();
        reloaded.load(&mut nv).unwrap();
        assert_eq!(reloaded.count(), 1);
        assert_eq!(reloaded.channel(0), 2);
        assert_eq!(reloaded.label(0), "Kitchen");
    }
}
