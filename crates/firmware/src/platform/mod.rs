//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the microcontroller
//! platform. All platform-specific code must be isolated to this module.

pub mod error;
pub mod traits;

#[cfg(feature = "pico")]
pub mod time;

// Platform implementations
#[cfg(feature = "pico")]
pub mod rp2040;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{FlashInterface, I2cInterface, UartInterface};

#[cfg(feature = "pico")]
pub use time::EmbassyTime;
