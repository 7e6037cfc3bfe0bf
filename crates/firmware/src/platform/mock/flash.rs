//! Mock Flash for host tests

use crate::platform::{
    error::{FlashError, PlatformError},
    traits::FlashInterface,
    Result,
};

const BLOCK_SIZE: u32 = 4096;
const CAPACITY: u32 = 2 * BLOCK_SIZE;

/// In-memory Flash with real erase-before-write semantics: writes only
/// clear bits, so a missing erase shows up as corrupt data in tests.
pub struct MockFlash {
    memory: [u8; CAPACITY as usize],
    /// Number of erase operations performed
    pub erase_count: usize,
}

impl Default for MockFlash {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFlash {
    pub fn new() -> Self {
        Self {
            memory: [0xFF; CAPACITY as usize],
            erase_count: 0,
        }
    }

    fn check_range(&self, address: u32, len: usize) -> Result<()> {
        if address as usize + len > CAPACITY as usize {
            return Err(PlatformError::Flash(FlashError::InvalidAddress));
        }
        Ok(())
    }
}

impl FlashInterface for MockFlash {
    fn read(&mut self, address: u32, buf: &mut [u8]) -> Result<()> {
        self.check_range(address, buf.len())?;
        let start = address as usize;
        buf.copy_from_slice(&self.memory[start..start + buf.len()]);
        Ok(())
    }

    fn write(&mut self, address: u32, data: &[u8]) -> Result<()> {
        self.check_range(address, data.len())?;
        let start = address as usize;
        for (cell, &byte) in self.memory[start..start + data.len()].iter_mut().zip(data) {
            // NOR semantics: only 1 -> 0 transitions
            *cell &= byte;
        }
        Ok(())
    }

    fn erase(&mut self, address: u32, size: u32) -> Result<()> {
        if address % BLOCK_SIZE != 0 || size % BLOCK_SIZE != 0 {
            return Err(PlatformError::Flash(FlashError::InvalidAddress));
        }
        self.check_range(address, size as usize)?;
        let start = address as usize;
        self.memory[start..start + size as usize].fill(0xFF);
        self.erase_count += 1;
        Ok(())
    }

    fn block_size(&self) -> u32 {
        BLOCK_SIZE
    }

    fn capacity(&self) -> u32 {
        CAPACITY
    }
}
