//! Configuration store error types

use crate::traits::NvError;

/// Errors from configuration store operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Store already holds the maximum number of shutters
    CapacityExceeded,
    /// Referenced shutter index is not defined
    InvalidIndex,
    /// Save attempted with zero configured shutters
    NoEntries,
    /// Stored count is zero or exceeds the maximum (uninitialized or
    /// corrupt storage); the store has been reset to empty
    InvalidStoredCount,
    /// Underlying non-volatile storage failed
    Storage(NvError),
}

impl From<NvError> for ConfigError {
    fn from(err: NvError) -> Self {
        ConfigError::Storage(err)
    }
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ConfigError::CapacityExceeded => write!(f, "shutter table full"),
            ConfigError::InvalidIndex => write!(f, "shutter not defined"),
            ConfigError::NoEntries => write!(f, "no shutters defined"),
            ConfigError::InvalidStoredCount => write!(f, "stored configuration invalid"),
            ConfigError::Storage(e) => write!(f, "storage error: {}", e),
        }
    }
}
