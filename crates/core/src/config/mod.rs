//! Shutter configuration store
//!
//! Owns the authoritative ordered list of configured shutters and their
//! actuation parameters, and persists them as fixed-size records through
//! the [`NvStorage`] trait.
//!
//! # Storage layout
//!
//! ```text
//! [count:u8][record 0][record 1]...   record = 15 bytes, little-endian
//! ```
//!
//! A stored count of zero or above [`MAX_SHUTTERS`] is treated as "no valid
//! configuration" (guards against uninitialized or corrupt storage).

pub mod error;

pub use error::ConfigError;

use crate::traits::NvStorage;
use core::fmt::Write;
use heapless::String;

/// Maximum number of shutters the store can hold
pub const MAX_SHUTTERS: usize = 4;

/// Maximum label length in characters; longer labels are silently truncated
pub const LABEL_LEN: usize = 7;

/// `digital_input` sentinel for "no input line mapped"
pub const NO_INPUT: i8 = -1;

/// Size of one serialized shutter record in bytes
pub const RECORD_SIZE: usize = 2 + 2 + 2 + 2 + LABEL_LEN;

/// Actuation parameters for one shutter
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ShutterConfig {
    /// Output index on the actuator board
    pub channel: u8,
    /// Index into the debounced input bit-vector, or [`NO_INPUT`]
    pub digital_input: i8,
    /// Actuation value for the open end state (PWM ticks or drive force)
    pub pos_open: u16,
    /// Actuation value for the closed end state
    pub pos_closed: u16,
    /// Nominal time for a full open/close transit
    pub transit_delay_ms: u16,
    /// Display label, at most [`LABEL_LEN`] characters
    pub label: String<LABEL_LEN>,
}

impl ShutterConfig {
    /// Serialize to a fixed-size record (little-endian, NUL-padded label).
    pub fn to_bytes(&self) -> [u8; RECORD_SIZE] {
        let mut buf = [0u8; RECORD_SIZE];
        buf[0] = self.channel;
        buf[1] = self.digital_input as u8;
        buf[2..4].copy_from_slice(&self.pos_open.to_le_bytes());
        buf[4..6].copy_from_slice(&self.pos_closed.to_le_bytes());
        buf[6..8].copy_from_slice(&self.transit_delay_ms.to_le_bytes());
        let label = self.label.as_bytes();
        buf[8..8 + label.len()].copy_from_slice(label);
        buf
    }

    /// Deserialize from a fixed-size record.
    ///
    /// Returns `None` if the buffer is too short or the label bytes are not
    /// valid UTF-8 (corrupt storage).
    pub fn from_bytes(buf: &[u8]) -> Option<Self> {
        if buf.len() < RECORD_SIZE {
            return None;
        }
        let label_bytes = &buf[8..8 + LABEL_LEN];
        let label_end = label_bytes
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(LABEL_LEN);
        let label_str = core::str::from_utf8(&label_bytes[..label_end]).ok()?;

        Some(Self {
            channel: buf[0],
            digital_input: buf[1] as i8,
            pos_open: u16::from_le_bytes([buf[2], buf[3]]),
            pos_closed: u16::from_le_bytes([buf[4], buf[5]]),
            transit_delay_ms: u16::from_le_bytes([buf[6], buf[7]]),
            label: String::try_from(label_str).ok()?,
        })
    }
}

/// Truncate a label to the fixed capacity, silently.
fn truncate_label(label: &str) -> String<LABEL_LEN> {
    let mut out = String::new();
    for ch in label.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

/// Configuration store: ordered shutter list, index = logical shutter id.
///
/// Indices are dense `0..count-1`. Accessors are defined only for
/// `index < count()`; callers range-check beforehand ([`ConfigStore::set`]
/// is the only internally checked mutator).
#[derive(Debug, Clone, Default)]
pub struct ConfigStore {
    entries: [ShutterConfig; MAX_SHUTTERS],
    count: usize,
}

impl ConfigStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of configured shutters.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Set parameters for an existing shutter (`Some(index)`) or append a
    /// new one (`None`). Returns the affected index.
    ///
    /// The label is truncated to [`LABEL_LEN`] characters, not rejected.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::CapacityExceeded`] when appending at capacity
    /// - [`ConfigError::InvalidIndex`] when replacing an undefined index
    ///
    /// Either way the store is left unmodified.
    pub fn set(
        &mut self,
        index: Option<usize>,
        channel: u8,
        digital_input: i8,
        pos_open: u16,
        pos_closed: u16,
        transit_delay_ms: u16,
        label: &str,
    ) -> Result<usize, ConfigError> {
        let selected = match index {
            None => {
                if self.count >= MAX_SHUTTERS {
                    return Err(ConfigError::CapacityExceeded);
                }
                let idx = self.count;
                self.count += 1;
                idx
            }
            Some(idx) if idx >= self.count => return Err(ConfigError::InvalidIndex),
            Some(idx) => idx,
        };

        self.entries[selected] = ShutterConfig {
            channel,
            digital_input,
            pos_open,
            pos_closed,
            transit_delay_ms,
            label: truncate_label(label),
        };
        Ok(selected)
    }

    /// Reset the count to zero.
    ///
    /// Non-volatile storage is untouched until an explicit [`ConfigStore::save`].
    pub fn clear(&mut self) {
        self.count = 0;
    }

    /// Actuator board output index for shutter `index`.
    pub fn channel(&self, index: usize) -> u8 {
        debug_assert!(index < self.count);
        self.entries[index].channel
    }

    /// Digital input line for shutter `index`, or [`NO_INPUT`].
    pub fn digital_input(&self, index: usize) -> i8 {
        debug_assert!(index < self.count);
        self.entries[index].digital_input
    }

    /// Open end-state actuation value for shutter `index`.
    pub fn pos_open(&self, index: usize) -> u16 {
        debug_assert!(index < self.count);
        self.entries[index].pos_open
    }

    /// Closed end-state actuation value for shutter `index`.
    pub fn pos_closed(&self, index: usize) -> u16 {
        debug_assert!(index < self.count);
        self.entries[index].pos_closed
    }

    /// Nominal transit time for shutter `index` in milliseconds.
    pub fn transit_delay(&self, index: usize) -> u16 {
        debug_assert!(index < self.count);
        self.entries[index].transit_delay_ms
    }

    /// Label for shutter `index`, unpadded.
    pub fn label(&self, index: usize) -> &str {
        debug_assert!(index < self.count);
        self.entries[index].label.as_str()
    }

    /// Label for shutter `index` at fixed width, left-justified and
    /// space-padded (for tabular display).
    pub fn print_label(&self, index: usize) -> String<LABEL_LEN> {
        debug_assert!(index < self.count);
        let mut out = String::new();
        let _ = write!(
            out,
            "{:<width$}",
            self.entries[index].label.as_str(),
            width = LABEL_LEN
        );
        out
    }

    /// Persist the store as one length-prefixed record block.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoEntries`] when nothing is configured (the stored
    ///   image is left untouched)
    /// - [`ConfigError::Storage`] when the underlying write fails
    pub fn save<N: NvStorage>(&self, nv: &mut N) -> Result<(), ConfigError> {
        if self.count == 0 {
            return Err(ConfigError::NoEntries);
        }

        let mut buf = [0u8; 1 + MAX_SHUTTERS * RECORD_SIZE];
        buf[0] = self.count as u8;
        for (idx, entry) in self.entries[..self.count].iter().enumerate() {
            let start = 1 + idx * RECORD_SIZE;
            buf[start..start + RECORD_SIZE].copy_from_slice(&entry.to_bytes());
        }
        nv.write(0, &buf[..1 + self.count * RECORD_SIZE])?;
        Ok(())
    }

    /// Restore the store from non-volatile storage.
    ///
    /// Validate-then-commit: the in-memory list is replaced only once every
    /// stored record has parsed. Any failure resets the store to empty.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::InvalidStoredCount`] when the stored count is zero,
    ///   exceeds [`MAX_SHUTTERS`], or a record is unreadable
    /// - [`ConfigError::Storage`] when the underlying read fails
    pub fn load<N: NvStorage>(&mut self, nv: &mut N) -> Result<(), ConfigError> {
        let mut count_buf = [0u8; 1];
        if let Err(e) = nv.read(0, &mut count_buf) {
            self.count = 0;
            return Err(e.into());
        }

        let stored = count_buf[0] as usize;
        if stored == 0 || stored > MAX_SHUTTERS {
            self.count = 0;
            return Err(ConfigError::InvalidStoredCount);
        }

        let mut record = [0u8; RECORD_SIZE];
        let mut loaded: [ShutterConfig; MAX_SHUTTERS] =
            core::array::from_fn(|_| ShutterConfig::default());
        for idx in 0..stored {
            if let Err(e) = nv.read(1 + idx * RECORD_SIZE, &mut record) {
                self.count = 0;
                return Err(e.into());
            }
            match ShutterConfig::from_bytes(&record) {
                Some(entry) => loaded[idx] = entry,
                None => {
                    self.count = 0;
                    return Err(ConfigError::InvalidStoredCount);
                }
            }
        }

        self.entries = loaded;
        self.count = stored;
        Ok(())
    }
}
