//! Device drivers
//!
//! I2C drivers for the two supported actuator boards. Both are PCA9685
//! based; the motor shield adds the H-bridge pin mapping on top.

pub mod motor_shield;
pub mod pca9685;

pub use motor_shield::MotorShield;
pub use pca9685::Pca9685;
