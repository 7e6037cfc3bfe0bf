//! Time abstraction for platform-agnostic timing operations.
//!
//! Provides the `TimeSource` trait that abstracts over different time
//! providers (Embassy, mock) so the protocol uptime query and the idle
//! disengage logic can be tested on host.

use core::cell::Cell;

/// Platform-agnostic monotonic time source.
///
/// Implementations:
/// - `EmbassyTime` (in the firmware crate) for embedded targets
/// - [`MockTime`] for host testing with controllable time
pub trait TimeSource {
    /// Returns current time in milliseconds since system start.
    fn now_ms(&self) -> u64;

    /// Returns elapsed time in milliseconds since a reference point.
    ///
    /// Uses saturating subtraction to handle potential overflow.
    fn elapsed_ms(&self, reference_ms: u64) -> u64 {
        self.now_ms().saturating_sub(reference_ms)
    }
}

/// Mock time source for testing with controllable time advancement.
///
/// # Example
///
/// ```
/// use pico_shutter_core::traits::{MockTime, TimeSource};
///
/// let time = MockTime::new();
/// assert_eq!(time.now_ms(), 0);
///
/// time.advance_ms(250);
/// assert_eq!(time.now_ms(), 250);
/// ```
#[derive(Clone, Default)]
pub struct MockTime {
    current_ms: Cell<u64>,
}

impl MockTime {
    /// Create a new mock time source starting at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the mock clock by `delta` milliseconds.
    pub fn advance_ms(&self, delta: u64) {
        self.current_ms.set(self.current_ms.get() + delta);
    }
}

impl TimeSource for MockTime {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_time_advance() {
        let time = MockTime::new();
        assert_eq!(time.now_ms(), 0);
        time.advance_ms(100);
        time.advance_ms(50);
        assert_eq!(time.now_ms(), 150);
    }

    #[test]
    fn test_elapsed_saturates() {
        let time = MockTime::new();
        time.advance_ms(10);
        assert_eq!(time.elapsed_ms(50), 0);
        assert_eq!(time.elapsed_ms(4), 6);
    }
}
