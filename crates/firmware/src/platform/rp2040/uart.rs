//! Buffered UART wrapper for Embassy-RP
//!
//! Wraps `embassy_rp::uart::BufferedUart` behind the blocking
//! `UartInterface`. The interrupt handler fills the receive buffer, so the
//! poll-style reads in the serial channel never lose bytes between polls.

use crate::platform::{
    error::{PlatformError, UartError},
    traits::UartInterface,
    Result,
};
use embassy_rp::uart::BufferedUart;
use embedded_io::{Read, ReadReady, Write};

/// Embassy-RP buffered UART wrapper
pub struct Rp2040Uart<'a, T: embassy_rp::uart::Instance> {
    uart: BufferedUart<'a, T>,
}

impl<'a, T: embassy_rp::uart::Instance> Rp2040Uart<'a, T> {
    /// Wrap an already-configured buffered UART.
    pub fn new(uart: BufferedUart<'a, T>) -> Self {
        Self { uart }
    }
}

impl<'a, T: embassy_rp::uart::Instance> UartInterface for Rp2040Uart<'a, T> {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        self.uart
            .write(data)
            .map_err(|_| PlatformError::Uart(UartError::WriteFailed))
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        if !self.read_ready()? {
            return Ok(0);
        }
        self.uart
            .read(buffer)
            .map_err(|_| PlatformError::Uart(UartError::ReadFailed))
    }

    fn read_ready(&mut self) -> Result<bool> {
        self.uart
            .read_ready()
            .map_err(|_| PlatformError::Uart(UartError::ReadFailed))
    }

    fn flush(&mut self) -> Result<()> {
        self.uart
            .flush()
            .map_err(|_| PlatformError::Uart(UartError::WriteFailed))
    }
}
