//! PCA9685 16-channel PWM controller driver
//!
//! Drives the servo breakout board directly and serves as the PWM stage of
//! the motor shield. Only the register subset this firmware needs is
//! implemented: mode setup, prescale, and per-channel on/off counts.

use crate::platform::{
    error::{I2cError, PlatformError},
    traits::I2cInterface,
    Result,
};

/// Default address of the servo breakout board
pub const SERVO_BOARD_ADDR: u8 = 0x40;

/// Number of PWM channels per chip
pub const NUM_CHANNELS: u8 = 16;

/// Full-scale counter value; `set_pwm(ch, FULL_ON, 0)` holds a channel high
pub const FULL_ON: u16 = 4096;

/// Internal oscillator frequency
const OSC_CLOCK_HZ: u32 = 25_000_000;

// Register map
const REG_MODE1: u8 = 0x00;
const REG_PRESCALE: u8 = 0xFE;
const REG_LED0_ON_L: u8 = 0x06;

// MODE1 bits
const MODE1_RESTART: u8 = 0x80;
const MODE1_AI: u8 = 0x20;
const MODE1_SLEEP: u8 = 0x10;

/// Compute the PRESCALE register value for a target PWM frequency.
///
/// Datasheet formula: `round(osc / (4096 * freq)) - 1`.
fn prescale_for(freq_hz: u32) -> u8 {
    let prescale = (OSC_CLOCK_HZ + (4096 * freq_hz) / 2) / (4096 * freq_hz) - 1;
    prescale as u8
}

/// PCA9685 driver over the platform I2C abstraction
pub struct Pca9685<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C: I2cInterface> Pca9685<I2C> {
    pub fn new(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Check whether the chip acknowledges its address.
    ///
    /// A NACK means the board is absent; bus faults still propagate.
    pub fn probe(&mut self) -> Result<bool> {
        let mut mode = [0u8; 1];
        match self.i2c.write_read(self.address, &[REG_MODE1], &mut mode) {
            Ok(()) => Ok(true),
            Err(PlatformError::I2c(I2cError::Nack)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Wake the chip, enable register auto-increment, and set the PWM
    /// frequency.
    pub fn init(&mut self, freq_hz: u32) -> Result<()> {
        self.i2c.write(self.address, &[REG_MODE1, MODE1_AI])?;
        self.set_pwm_freq(freq_hz)
    }

    /// Set the output frequency for all channels.
    ///
    /// The chip must be in sleep mode while PRESCALE is written.
    pub fn set_pwm_freq(&mut self, freq_hz: u32) -> Result<()> {
        let prescale = prescale_for(freq_hz);
        self.i2c
            .write(self.address, &[REG_MODE1, MODE1_AI | MODE1_SLEEP])?;
        self.i2c.write(self.address, &[REG_PRESCALE, prescale])?;
        self.i2c.write(self.address, &[REG_MODE1, MODE1_AI])?;
        // Oscillator startup takes up to 500 us; the restart bit re-enables
        // any outputs that were active before sleep
        self.i2c
            .write(self.address, &[REG_MODE1, MODE1_AI | MODE1_RESTART])
    }

    /// Program the on/off counter values for one channel.
    ///
    /// `on == 4096` forces the channel fully high, `off == 4096` fully low.
    pub fn set_pwm(&mut self, channel: u8, on: u16, off: u16) -> Result<()> {
        debug_assert!(channel < NUM_CHANNELS);
        let reg = REG_LED0_ON_L + 4 * channel;
        self.i2c.write(
            self.address,
            &[
                reg,
                (on & 0xFF) as u8,
                (on >> 8) as u8,
                (off & 0xFF) as u8,
                (off >> 8) as u8,
            ],
        )
    }

    /// Borrow the underlying bus, mainly for traffic inspection in tests.
    pub fn bus(&self) -> &I2C {
        &self.i2c
    }

    /// Drive every channel fully low.
    pub fn all_off(&mut self) -> Result<()> {
        for channel in 0..NUM_CHANNELS {
            self.set_pwm(channel, 0, FULL_ON)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockI2c;

    #[test]
    fn test_prescale_servo_frequency() {
        // 25 MHz / (4096 * 50 Hz) = 122.07, rounds to 122, minus 1
        assert_eq!(prescale_for(50), 121);
    }

    #[test]
    fn test_prescale_motor_frequency() {
        // 25 MHz / (4096 * 1600 Hz) = 3.81, rounds to 4, minus 1
        assert_eq!(prescale_for(1600), 3);
    }

    #[test]
    fn test_probe_absent_board_is_not_an_error() {
        let mut chip = Pca9685::new(MockI2c::new(), SERVO_BOARD_ADDR);
        assert_eq!(chip.probe(), Ok(false));
    }

    #[test]
    fn test_probe_present_board() {
        let bus = MockI2c::with_devices(&[SERVO_BOARD_ADDR]);
        let mut chip = Pca9685::new(bus, SERVO_BOARD_ADDR);
        assert_eq!(chip.probe(), Ok(true));
    }

    #[test]
    fn test_set_pwm_register_layout() {
        let bus = MockI2c::with_devices(&[SERVO_BOARD_ADDR]);
        let mut chip = Pca9685::new(bus, SERVO_BOARD_ADDR);
        chip.set_pwm(2, 0, 0x1A5).unwrap();

        let (addr, payload) = &chip.bus().writes()[0];
        assert_eq!(*addr, SERVO_BOARD_ADDR);
        // LED2 registers start at 0x06 + 4 * 2
        assert_eq!(payload.as_slice(), &[0x0E, 0x00, 0x00, 0xA5, 0x01]);
    }
}
