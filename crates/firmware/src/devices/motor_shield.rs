//! Adafruit Motor Shield v2 driver (DC motor subset)
//!
//! The shield is a PCA9685 at 0x60 wired to two TB6612 H-bridges. Each DC
//! motor takes three PWM channels: one for speed and two for the bridge
//! direction inputs. Only forward drive and release are needed here, which
//! covers solenoid-style shutter coils.

use crate::platform::{traits::I2cInterface, Result};

use super::pca9685::{Pca9685, FULL_ON};

/// Default address of the motor shield
pub const MOTOR_SHIELD_ADDR: u8 = 0x60;

/// Bridge PWM frequency used for DC motors
pub const MOTOR_PWM_HZ: u32 = 1600;

/// Number of DC motor terminals on the shield
pub const NUM_MOTORS: usize = 4;

/// PCA9685 channels per motor: (speed, in1, in2), in board M1..M4 order
const MOTOR_PINS: [(u8, u8, u8); NUM_MOTORS] = [(8, 10, 9), (13, 11, 12), (2, 4, 3), (7, 5, 6)];

/// Motor shield driver over the platform I2C abstraction
pub struct MotorShield<I2C> {
    pwm: Pca9685<I2C>,
}

impl<I2C: I2cInterface> MotorShield<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self {
            pwm: Pca9685::new(i2c, address),
        }
    }

    /// Check whether the shield acknowledges its address.
    pub fn probe(&mut self) -> Result<bool> {
        self.pwm.probe()
    }

    /// Initialize the PWM stage and release all motors.
    pub fn init(&mut self) -> Result<()> {
        self.pwm.init(MOTOR_PWM_HZ)?;
        self.pwm.all_off()
    }

    fn pin_high(&mut self, pin: u8) -> Result<()> {
        self.pwm.set_pwm(pin, FULL_ON, 0)
    }

    fn pin_low(&mut self, pin: u8) -> Result<()> {
        self.pwm.set_pwm(pin, 0, 0)
    }

    /// Borrow the underlying bus, mainly for traffic inspection in tests.
    pub fn bus(&self) -> &I2C {
        self.pwm.bus()
    }

    /// Set the duty cycle for one motor, 0..=255 scaled to 12 bits.
    pub fn set_speed(&mut self, motor: usize, speed: u8) -> Result<()> {
        let (speed_pin, _, _) = MOTOR_PINS[motor];
        self.pwm.set_pwm(speed_pin, 0, speed as u16 * 16)
    }

    /// Drive one motor forward at the configured speed.
    pub fn run_forward(&mut self, motor: usize) -> Result<()> {
        let (_, in1, in2) = MOTOR_PINS[motor];
        self.pin_low(in2)?;
        self.pin_high(in1)
    }

    /// Let one motor coast: both bridge inputs low.
    pub fn release(&mut self, motor: usize) -> Result<()> {
        let (_, in1, in2) = MOTOR_PINS[motor];
        self.pin_low(in1)?;
        self.pin_low(in2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockI2c;

    fn shield() -> MotorShield<MockI2c> {
        MotorShield::new(MockI2c::with_devices(&[MOTOR_SHIELD_ADDR]), MOTOR_SHIELD_ADDR)
    }

    #[test]
    fn test_set_speed_scales_to_12_bits() {
        let mut shield = shield();
        shield.set_speed(0, 255).unwrap();

        // M1 speed channel is 8, registers start at 0x06 + 4 * 8
        let (_, payload) = &shield.bus().writes()[0];
        assert_eq!(payload[0], 0x26);
        let off = payload[3] as u16 | (payload[4] as u16) << 8;
        assert_eq!(off, 4080);
    }

    #[test]
    fn test_release_pulls_both_bridge_inputs_low() {
        let mut shield = shield();
        shield.release(0).unwrap();

        let writes = shield.bus().writes();
        assert_eq!(writes.len(), 2);
        for (_, payload) in writes {
            // on = 0, off = 0 for both direction channels
            assert_eq!(&payload[1..], &[0, 0, 0, 0]);
        }
    }

    #[test]
    fn test_run_forward_sets_in1_high() {
        let mut shield = shield();
        shield.run_forward(0).unwrap();

        // Second write is in1 (channel 10), forced fully high
        let (_, payload) = &shield.bus().writes()[1];
        assert_eq!(payload[0], 0x06 + 4 * 10);
        let on = payload[1] as u16 | (payload[2] as u16) << 8;
        assert_eq!(on, FULL_ON);
    }
}
