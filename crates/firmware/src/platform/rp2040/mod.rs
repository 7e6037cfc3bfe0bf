//! RP2040 platform implementation
//!
//! Embassy-RP backed implementations of the platform traits, plus the
//! interrupt-driven Embassy tasks. Everything here requires the `pico`
//! feature.

pub mod flash;
pub mod i2c;
pub mod tasks;
pub mod uart;

pub use flash::Rp2040Flash;
pub use i2c::Rp2040I2c;
pub use uart::Rp2040Uart;
