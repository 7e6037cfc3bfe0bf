//! Mock UART for host tests

use crate::platform::{traits::UartInterface, Result};
use heapless::{Deque, Vec};

/// Scripted UART: tests queue receive bytes and inspect what was written.
#[derive(Debug, Default)]
pub struct MockUart {
    rx: Deque<u8, 256>,
    tx: Vec<u8, 256>,
}

impl MockUart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for the next reads.
    pub fn feed(&mut self, data: &[u8]) {
        for &byte in data {
            let _ = self.rx.push_back(byte);
        }
    }

    /// Queue a command line followed by the line terminator.
    pub fn feed_line(&mut self, line: &str) {
        self.feed(line.as_bytes());
        self.feed(b"\n");
    }

    /// Everything written so far.
    pub fn written(&self) -> &[u8] {
        &self.tx
    }

    /// Drop the write log.
    pub fn clear_written(&mut self) {
        self.tx.clear();
    }
}

impl UartInterface for MockUart {
    fn write(&mut self, data: &[u8]) -> Result<usize> {
        for &byte in data {
            let _ = self.tx.push(byte);
        }
        Ok(data.len())
    }

    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        let mut count = 0;
        while count < buffer.len() {
            match self.rx.pop_front() {
                Some(byte) => {
                    buffer[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        Ok(count)
    }

    fn read_ready(&mut self) -> Result<bool> {
        Ok(!self.rx.is_empty())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}
