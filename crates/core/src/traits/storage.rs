//! Non-volatile storage abstraction.
//!
//! The configuration store serializes itself through this byte-addressed
//! interface. The firmware crate maps it onto a reserved Flash sector
//! (erase-before-write); [`MockNvStorage`] provides an EEPROM-like
//! in-memory implementation for host tests.

/// Errors from non-volatile storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NvError {
    /// Access beyond the storage capacity
    OutOfBounds,
    /// Underlying read failed
    ReadFailed,
    /// Underlying write failed
    WriteFailed,
}

impl core::fmt::Display for NvError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            NvError::OutOfBounds => write!(f, "storage access out of bounds"),
            NvError::ReadFailed => write!(f, "storage read failed"),
            NvError::WriteFailed => write!(f, "storage write failed"),
        }
    }
}

/// Byte-addressed non-volatile storage.
///
/// Writes are bounded synchronous operations assumed to complete within
/// one orchestrator cycle. Implementations own any sector buffering or
/// erase sequencing the medium requires.
pub trait NvStorage {
    /// Read `buf.len()` bytes starting at `offset`.
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), NvError>;

    /// Write `data` starting at `offset`.
    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), NvError>;

    /// Usable capacity in bytes.
    fn capacity(&self) -> usize;
}

/// Capacity of the mock storage, sized like a small EEPROM.
pub const MOCK_NV_CAPACITY: usize = 256;

/// In-memory storage for host tests.
///
/// # Example
///
/// ```
/// use pico_shutter_core::traits::{MockNvStorage, NvStorage};
///
/// let mut nv = MockNvStorage::new();
/// nv.write(0, &[1, 2, 3]).unwrap();
///
/// let mut buf = [0u8; 3];
/// nv.read(0, &mut buf).unwrap();
/// assert_eq!(buf, [1, 2, 3]);
/// ```
pub struct MockNvStorage {
    data: [u8; MOCK_NV_CAPACITY],
    /// When set, the next write reports `NvError::WriteFailed`
    fail_next_write: bool,
}

impl Default for MockNvStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNvStorage {
    /// Create a new mock storage, zero-filled like a fresh EEPROM.
    pub fn new() -> Self {
        Self {
            data: [0; MOCK_NV_CAPACITY],
            fail_next_write: false,
        }
    }

    /// Make the next write fail (for testing error reporting).
    pub fn fail_next_write(&mut self) {
        self.fail_next_write = true;
    }

    /// Raw contents (for test verification).
    pub fn contents(&self) -> &[u8] {
        &self.data
    }

    /// Overwrite raw contents (for simulating pre-existing or corrupt data).
    pub fn set_contents(&mut self, offset: usize, data: &[u8]) {
        self.data[offset..offset + data.len()].copy_from_slice(data);
    }
}

impl NvStorage for MockNvStorage {
    fn read(&mut self, offset: usize, buf: &mut [u8]) -> Result<(), NvError> {
        let end = offset.checked_add(buf.len()).ok_or(NvError::OutOfBounds)?;
        if end > self.data.len() {
            return Err(NvError::OutOfBounds);
        }
        buf.copy_from_slice(&self.data[offset..end]);
        Ok(())
    }

    fn write(&mut self, offset: usize, data: &[u8]) -> Result<(), NvError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(NvError::WriteFailed);
        }
        let end = offset.checked_add(data.len()).ok_or(NvError::OutOfBounds)?;
        if end > self.data.len() {
            return Err(NvError::OutOfBounds);
        }
        self.data[offset..end].copy_from_slice(data);
        Ok(())
    }

    fn capacity(&self) -> usize {
        self.data.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_round_trip() {
        let mut nv = MockNvStorage::new();
        nv.write(10, &[0xAA, 0xBB]).unwrap();
        let mut buf = [0u8; 2];
        nv.read(10, &mut buf).unwrap();
        assert_eq!(buf, [0xAA, 0xBB]);
    }

    #[test]
    fn test_out_of_bounds_rejected() {
        let mut nv = MockNvStorage::new();
        assert_eq!(
            nv.write(MOCK_NV_CAPACITY - 1, &[0, 0]),
            Err(NvError::OutOfBounds)
        );
        let mut buf = [0u8; 4];
        assert_eq!(nv.read(MOCK_NV_CAPACITY, &mut buf), Err(NvError::OutOfBounds));
    }

    #[test]
    fn test_injected_write_failure() {
        let mut nv = MockNvStorage::new();
        nv.fail_next_write();
        assert_eq!(nv.write(0, &[1]), Err(NvError::WriteFailed));
        // Failure is one-shot
        assert_eq!(nv.write(0, &[1]), Ok(()));
    }
}
