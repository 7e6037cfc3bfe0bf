//! Shutter actuator implementations
//!
//! Bridges the core `ShutterDrive` trait to the I2C actuator boards. The
//! board type is a build-time choice in the firmware binary; both variants
//! share the bus abstraction so host tests can script either one.

pub mod servo;
pub mod solenoid;

pub use servo::ServoActuator;
pub use solenoid::SolenoidActuator;

use crate::platform::{error::PlatformError, traits::I2cInterface};
use pico_shutter_core::actuator::{DriveError, ShutterDrive};
use pico_shutter_core::orchestrator::ReleaseAfter;

/// Which actuator hardware a build drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorKind {
    /// RC servos on the PCA9685 breakout, pulse-width positioning
    RcServo,
    /// Solenoid coils on the motor shield, hold-force drive
    Solenoid,
}

/// How long a servo stays engaged after its last drive
pub const SERVO_IDLE_DISENGAGE_MS: u64 = 60_000;

pub(crate) fn map_bus_error(_error: PlatformError) -> DriveError {
    DriveError::Bus
}

/// Either actuator behind one concrete type, for the non-generic main loop.
pub enum ShutterActuator<I2C> {
    Servo(ServoActuator<I2C>),
    Solenoid(SolenoidActuator<I2C>),
}

impl<I2C: I2cInterface> ShutterActuator<I2C> {
    pub fn new(kind: ActuatorKind, i2c: I2C) -> Self {
        match kind {
            ActuatorKind::RcServo => Self::Servo(ServoActuator::new(i2c)),
            ActuatorKind::Solenoid => Self::Solenoid(SolenoidActuator::new(i2c)),
        }
    }

    /// Release policy appropriate for this hardware.
    pub fn release_policy(&self) -> ReleaseAfter {
        match self {
            // Stop the pulse train once the servo has been idle a while
            Self::Servo(_) => ReleaseAfter::IdleMs(SERVO_IDLE_DISENGAGE_MS),
            // The coil pushes for the configured transit time, then coasts
            Self::Solenoid(_) => ReleaseAfter::TransitDelay,
        }
    }
}

impl<I2C: I2cInterface> ShutterDrive for ShutterActuator<I2C> {
    fn init(&mut self) -> Result<(), DriveError> {
        match self {
            Self::Servo(servo) => servo.init(),
            Self::Solenoid(solenoid) => solenoid.init(),
        }
    }

    fn drive_value(&mut self, channel: u8, value: u16) -> Result<(), DriveError> {
        match self {
            Self::Servo(servo) => servo.drive_value(channel, value),
            Self::Solenoid(solenoid) => solenoid.drive_value(channel, value),
        }
    }
}
