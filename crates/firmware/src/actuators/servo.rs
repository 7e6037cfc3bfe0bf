//! RC servo actuator on the PCA9685 breakout
//!
//! Drive values are raw PCA9685 off-counts at 50 Hz, so the usable servo
//! range is roughly 100 to 500. The configured end positions carry the
//! calibration; this layer passes the value straight to the board, so
//! 4096 selects the full-on encoding.

use crate::devices::pca9685::{Pca9685, SERVO_BOARD_ADDR};
use crate::platform::traits::I2cInterface;
use pico_shutter_core::actuator::{DriveError, ShutterDrive};

use super::map_bus_error;

/// Servo refresh rate
const SERVO_PWM_HZ: u32 = 50;

pub struct ServoActuator<I2C> {
    board: Pca9685<I2C>,
}

impl<I2C: I2cInterface> ServoActuator<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            board: Pca9685::new(i2c, SERVO_BOARD_ADDR),
        }
    }

    /// Borrow the underlying bus, mainly for traffic inspection in tests.
    pub fn bus(&self) -> &I2C {
        self.board.bus()
    }
}

impl<I2C: I2cInterface> ShutterDrive for ServoActuator<I2C> {
    fn init(&mut self) -> Result<(), DriveError> {
        match self.board.probe() {
            Ok(true) => {}
            Ok(false) => return Err(DriveError::BoardNotFound),
            Err(e) => return Err(map_bus_error(e)),
        }
        self.board.init(SERVO_PWM_HZ).map_err(map_bus_error)
    }

    fn drive_value(&mut self, channel: u8, value: u16) -> Result<(), DriveError> {
        // Value 0 stops the pulse train and lets the servo go limp
        self.board.set_pwm(channel, 0, value).map_err(map_bus_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockI2c;

    #[test]
    fn test_init_without_board_is_fatal() {
        let mut servo = ServoActuator::new(MockI2c::new());
        assert_eq!(servo.init(), Err(DriveError::BoardNotFound));
    }

    #[test]
    fn test_init_bus_fault_is_fatal() {
        use crate::platform::error::I2cError;

        let mut bus = MockI2c::with_devices(&[SERVO_BOARD_ADDR]);
        bus.fail_next(I2cError::BusError);
        let mut servo = ServoActuator::new(bus);
        assert_eq!(servo.init(), Err(DriveError::Bus));
    }

    #[test]
    fn test_drive_value_reaches_board_unmodified() {
        let bus = MockI2c::with_devices(&[SERVO_BOARD_ADDR]);
        let mut servo = ServoActuator::new(bus);
        servo.drive_value(3, 4096).unwrap();

        let (_, payload) = &servo.bus().writes()[0];
        let off = payload[3] as u16 | (payload[4] as u16) << 8;
        assert_eq!(off, 4096);
    }
}
