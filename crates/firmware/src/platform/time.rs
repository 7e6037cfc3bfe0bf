//! Embassy-based time source implementation.
//!
//! This module provides the `EmbassyTime` implementation of the
//! `TimeSource` trait using Embassy's time driver.

use pico_shutter_core::traits::TimeSource;

/// Embassy-based time source using the Embassy time driver.
///
/// Millisecond resolution is sufficient for every consumer here: the
/// uptime report, the idle disengage interval, and the debounce engine.
#[derive(Clone, Copy, Default)]
pub struct EmbassyTime;

impl TimeSource for EmbassyTime {
    fn now_ms(&self) -> u64 {
        embassy_time::Instant::now().as_millis()
    }
}
