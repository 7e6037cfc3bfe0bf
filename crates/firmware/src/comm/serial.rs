//! Serial command channel
//!
//! Couples the UART to the line protocol: accumulates received bytes into
//! lines, hands complete lines to the protocol dispatcher, and writes the
//! single response line back. At most one command is processed per poll so
//! the main loop keeps cycling between commands.

use crate::platform::{traits::UartInterface, Result};
use pico_shutter_core::actuator::ShutterState;
use pico_shutter_core::config::ConfigStore;
use pico_shutter_core::protocol::{process_line, LineReader, ProtocolAction, Response};
use pico_shutter_core::traits::NvStorage;

pub struct SerialComm<U> {
    uart: U,
    reader: LineReader,
}

impl<U: UartInterface> SerialComm<U> {
    pub fn new(uart: U) -> Self {
        Self {
            uart,
            reader: LineReader::new(),
        }
    }

    /// Drain received bytes and process at most one complete command.
    ///
    /// Returns the decoded action for the orchestrator; `None` when no full
    /// line arrived yet. Remaining buffered bytes wait for the next poll.
    pub fn poll<N: NvStorage>(
        &mut self,
        store: &mut ConfigStore,
        states: &[ShutterState],
        nv: &mut N,
        uptime_ms: u64,
    ) -> Result<ProtocolAction> {
        while self.uart.read_ready()? {
            let mut byte = [0u8; 1];
            if self.uart.read(&mut byte)? == 0 {
                break;
            }
            if let Some(line) = self.reader.push(byte[0]) {
                let mut response = Response::new();
                let action = process_line(&line, store, states, nv, uptime_ms, &mut response);
                self.uart.write(response.as_bytes())?;
                self.uart.write(b"\r\n")?;
                self.uart.flush()?;
                return Ok(action);
            }
        }
        Ok(ProtocolAction::None)
    }

    /// Borrow the underlying UART, mainly for inspection in tests.
    pub fn uart_mut(&mut self) -> &mut U {
        &mut self.uart
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockUart;
    use pico_shutter_core::traits::MockNvStorage;

    struct Harness {
        comm: SerialComm<MockUart>,
        store: ConfigStore,
        nv: MockNvStorage,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                comm: SerialComm::new(MockUart::new()),
                store: ConfigStore::new(),
                nv: MockNvStorage::new(),
            }
        }

        fn poll(&mut self) -> ProtocolAction {
            let states = [ShutterState::Undefined; 4];
            let count = self.store.count();
            self.comm
                .poll(&mut self.store, &states[..count], &mut self.nv, 0)
                .unwrap()
        }

        fn written(&mut self) -> String {
            let text = String::from_utf8(self.comm.uart_mut().written().to_vec()).unwrap();
            self.comm.uart_mut().clear_written();
            text
        }
    }

    #[test]
    fn test_command_produces_terminated_response() {
        let mut h = Harness::new();
        h.comm.uart_mut().feed_line("GND");
        h.poll();
        assert_eq!(h.written(), "ND=0\r\n");
    }

    #[test]
    fn test_partial_line_waits_for_terminator() {
        let mut h = Harness::new();
        h.comm.uart_mut().feed(b"GN");
        assert_eq!(h.poll(), ProtocolAction::None);
        assert_eq!(h.written(), "");

        h.comm.uart_mut().feed(b"D\n");
        h.poll();
        assert_eq!(h.written(), "ND=0\r\n");
    }

    #[test]
    fn test_one_command_per_poll() {
        let mut h = Harness::new();
        h.comm.uart_mut().feed_line("GND");
        h.comm.uart_mut().feed_line("GTI");

        h.poll();
        assert_eq!(h.written(), "ND=0\r\n");
        h.poll();
        assert_eq!(h.written(), "TI=0\r\n");
    }

    #[test]
    fn test_state_command_reaches_orchestrator() {
        let mut h = Harness::new();
        h.store.set(None, 0, -1, 150, 600, 1200, "Lab").unwrap();

        h.comm.uart_mut().feed_line("SST0,1");
        let action = h.poll();
        assert_eq!(
            action,
            ProtocolAction::StateChange {
                device: 0,
                state: ShutterState::Open
            }
        );
        assert_eq!(h.written(), "OK\r\n");
    }
}
