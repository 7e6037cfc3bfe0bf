//! Mock platform implementations for host tests
//!
//! Scripted stand-ins for the platform traits. Available in test builds
//! and behind the `mock` feature.

pub mod flash;
pub mod i2c;
pub mod uart;

pub use flash::MockFlash;
pub use i2c::MockI2c;
pub use uart::MockUart;
