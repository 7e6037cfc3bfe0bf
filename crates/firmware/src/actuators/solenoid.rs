//! Solenoid actuator on the motor shield
//!
//! Each shutter coil hangs off one DC motor terminal. Drive values are
//! hold forces: 0 releases the coil, anything else clamps to the 0..=255
//! duty range and drives the terminal forward.

use crate::devices::motor_shield::{MotorShield, MOTOR_SHIELD_ADDR, NUM_MOTORS};
use crate::platform::traits::I2cInterface;
use pico_shutter_core::actuator::{DriveError, ShutterDrive};

use super::map_bus_error;

pub struct SolenoidActuator<I2C> {
    shield: MotorShield<I2C>,
}

impl<I2C: I2cInterface> SolenoidActuator<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            shield: MotorShield::new(i2c, MOTOR_SHIELD_ADDR),
        }
    }

    /// Borrow the underlying bus, mainly for traffic inspection in tests.
    pub fn bus(&self) -> &I2C {
        self.shield.bus()
    }
}

impl<I2C: I2cInterface> ShutterDrive for SolenoidActuator<I2C> {
    fn init(&mut self) -> Result<(), DriveError> {
        match self.shield.probe() {
            Ok(true) => {}
            Ok(false) => return Err(DriveError::BoardNotFound),
            Err(e) => return Err(map_bus_error(e)),
        }
        self.shield.init().map_err(map_bus_error)
    }

    fn drive_value(&mut self, channel: u8, value: u16) -> Result<(), DriveError> {
        // Channels beyond the motor terminals are silently ignored, which
        // lets one configuration serve both actuator types
        if channel as usize >= NUM_MOTORS {
            return Ok(());
        }
        let motor = channel as usize;
        if value == 0 {
            return self.shield.release(motor).map_err(map_bus_error);
        }
        let force = value.min(255) as u8;
        self.shield.set_speed(motor, force).map_err(map_bus_error)?;
        self.shield.run_forward(motor).map_err(map_bus_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockI2c;

    fn driven() -> SolenoidActuator<MockI2c> {
        SolenoidActuator::new(MockI2c::with_devices(&[MOTOR_SHIELD_ADDR]))
    }

    #[test]
    fn test_init_without_shield_is_fatal() {
        let mut solenoid = SolenoidActuator::new(MockI2c::new());
        assert_eq!(solenoid.init(), Err(DriveError::BoardNotFound));
    }

    #[test]
    fn test_out_of_range_channel_is_a_no_op() {
        let mut solenoid = driven();
        solenoid.drive_value(4, 200).unwrap();
        assert!(solenoid.bus().writes().is_empty());
    }

    #[test]
    fn test_zero_value_releases_the_coil() {
        let mut solenoid = driven();
        solenoid.drive_value(0, 0).unwrap();

        // Two direction-channel writes, both fully low
        let writes = solenoid.bus().writes();
        assert_eq!(writes.len(), 2);
        for (_, payload) in writes {
            assert_eq!(&payload[1..], &[0, 0, 0, 0]);
        }
    }

    #[test]
    fn test_force_clamps_to_duty_range() {
        let mut solenoid = driven();
        solenoid.drive_value(1, 4095).unwrap();

        // First write is the speed channel, clamped to 255 * 16
        let (_, payload) = &solenoid.bus().writes()[0];
        let off = payload[3] as u16 | (payload[4] as u16) << 8;
        assert_eq!(off, 4080);
    }
}
