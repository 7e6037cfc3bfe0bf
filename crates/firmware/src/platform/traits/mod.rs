//! Platform interface traits
//!
//! Hardware access crosses one of these traits so that device drivers,
//! storage, and the serial channel stay testable on the host.

pub mod flash;
pub mod i2c;
pub mod uart;

pub use flash::FlashInterface;
pub use i2c::I2cInterface;
pub use uart::{UartConfig, UartInterface};
