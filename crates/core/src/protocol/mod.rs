//! Serial line protocol parser and dispatcher
//!
//! Single-command-per-line ASCII protocol: case-sensitive 3-letter opcodes,
//! comma-separated decimal fields, one configurable terminator byte (LF or
//! CR). Every processed line produces exactly one response line; query
//! commands answer with a formatted value, everything else with `OK` or a
//! single `Error: ...` line. Hosts key on the `OK`/`Error` prefixes and the
//! `TI=`/`ND=`/`ST<d>=`/`DL<d>=`/`TD<d>=`/`PR<d>,` response shapes, so those
//! are fixed.
//!
//! Dispatch scans literal opcode prefixes in a fixed order. No opcode in
//! this set is a prefix of another; when adding opcodes, re-verify that
//! property before extending the scan.
//!
//! Parsing is validate-then-commit: a malformed line is reported and fully
//! discarded without touching the store or any state.

use crate::actuator::ShutterState;
use crate::config::ConfigStore;
use crate::traits::NvStorage;
use core::fmt::Write;
use heapless::{String, Vec};

/// Identification string returned for `*IDN?`
pub const ID_STRING: &str = "Pico Shutter 1.0";

/// Maximum command length in bytes; longer input is truncated at read time
pub const MAX_LINE: usize = 50;

/// Maximum response line length in bytes
pub const RESPONSE_LEN: usize = 64;

/// Line terminator byte, LF or CR (build-time configuration)
pub const TERMINATOR: u8 = b'\n';

/// One response line, without terminator
pub type Response = String<RESPONSE_LEN>;

const ERR_TOO_SHORT: &str = "Error: Command needs to be at least 3 characters.";
const ERR_INVALID_DEVICE: &str = "Error: Invalid device number.";
const ERR_INVALID_STATE: &str = "Error: Invalid state.";
const ERR_SET_FAILED: &str = "Error: Could not set shutter parameters.";
const ERR_SAVE_FAILED: &str = "Error: Save failed";
const ERR_UNRECOGNIZED: &str = "Error: Unrecognized command";

/// Decoded result of one incoming line.
///
/// Produced fresh on every poll; carries no identity beyond one
/// orchestrator cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolAction {
    /// Nothing for the orchestrator to do
    None,
    /// Host requested a logical state change (`SST`)
    StateChange {
        device: usize,
        state: ShutterState,
    },
    /// Host requested a raw actuation value (`SSP`), not range-checked
    ManualPosition {
        device: usize,
        value: u16,
    },
    /// Configuration was cleared or rewritten (`CLR`/`SPR`)
    ConfigChanged,
}

/// Accumulates serial bytes into terminator-delimited lines.
///
/// A line longer than [`MAX_LINE`] is emitted truncated; the overflowing
/// byte starts the next line (mirroring a bounded terminated read, where
/// the remainder stays in the receive buffer).
#[derive(Debug, Default)]
pub struct LineReader {
    buf: Vec<u8, MAX_LINE>,
}

impl LineReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns a completed line (without terminator) when
    /// the terminator arrives or the buffer fills.
    pub fn push(&mut self, byte: u8) -> Option<Vec<u8, MAX_LINE>> {
        if byte == TERMINATOR {
            return Some(core::mem::take(&mut self.buf));
        }
        if self.buf.push(byte).is_err() {
            let line = core::mem::take(&mut self.buf);
            // Start the next line with the byte that did not fit
            let _ = self.buf.push(byte);
            return Some(line);
        }
        None
    }
}

/// Parse a decimal integer prefix: optional sign, then at least one digit.
/// Trailing non-digit bytes are ignored (scanf-style tolerance).
fn parse_int_prefix(s: &str) -> Option<i32> {
    let bytes = s.as_bytes();
    let mut idx = 0;
    let mut negative = false;
    if let Some(&sign) = bytes.first() {
        if sign == b'+' || sign == b'-' {
            negative = sign == b'-';
            idx = 1;
        }
    }
    let start = idx;
    let mut value: i32 = 0;
    while idx < bytes.len() && bytes[idx].is_ascii_digit() {
        value = value
            .checked_mul(10)?
            .checked_add((bytes[idx] - b'0') as i32)?;
        idx += 1;
    }
    if idx == start {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Range-check a parsed device number against the configured count.
fn check_device(device: i32, count: usize) -> Option<usize> {
    if device < 0 || device as usize >= count {
        None
    } else {
        Some(device as usize)
    }
}

fn format_error(response: &mut Response, opcode: &str) {
    let _ = write!(response, "Error: Invalid {} command format.", opcode);
}

/// Process one complete input line and build its single response line.
///
/// `raw` is the line as read, without terminator; `states` is the
/// orchestrator's logical state table, indexed like the store.
pub fn process_line<N: NvStorage>(
    raw: &[u8],
    store: &mut ConfigStore,
    states: &[ShutterState],
    nv: &mut N,
    uptime_ms: u64,
    response: &mut Response,
) -> ProtocolAction {
    response.clear();

    // Gate on raw byte count, before any trimming
    if raw.len() < 3 {
        let _ = response.push_str(ERR_TOO_SHORT);
        return ProtocolAction::None;
    }

    let Ok(line) = core::str::from_utf8(raw) else {
        let _ = response.push_str(ERR_UNRECOGNIZED);
        return ProtocolAction::None;
    };
    // Tolerate CRLF hosts when the terminator is LF
    let line = line.trim_end_matches('\r');

    if line.starts_with("*IDN?") {
        let _ = response.push_str(ID_STRING);
        return ProtocolAction::None;
    }

    if line.starts_with("GTI") {
        let _ = write!(response, "TI={}", uptime_ms);
        return ProtocolAction::None;
    }

    if line.starts_with("GND") {
        let _ = write!(response, "ND={}", store.count());
        return ProtocolAction::None;
    }

    if let Some(rest) = line.strip_prefix("GST") {
        let Some(device) = parse_int_prefix(rest) else {
            format_error(response, "GST");
            return ProtocolAction::None;
        };
        let Some(device) = check_device(device, store.count()) else {
            let _ = response.push_str(ERR_INVALID_DEVICE);
            return ProtocolAction::None;
        };
        let state = states.get(device).copied().unwrap_or_default();
        let _ = write!(response, "ST{}={}", device, state);
        return ProtocolAction::None;
    }

    if let Some(rest) = line.strip_prefix("GDL") {
        let Some(device) = parse_int_prefix(rest) else {
            format_error(response, "GDL");
            return ProtocolAction::None;
        };
        let Some(device) = check_device(device, store.count()) else {
            let _ = response.push_str(ERR_INVALID_DEVICE);
            return ProtocolAction::None;
        };
        let _ = write!(response, "DL{}={}", device, store.label(device));
        return ProtocolAction::None;
    }

    if let Some(rest) = line.strip_prefix("GTD") {
        let Some(device) = parse_int_prefix(rest) else {
            format_error(response, "GTD");
            return ProtocolAction::None;
        };
        let Some(device) = check_device(device, store.count()) else {
            let _ = response.push_str(ERR_INVALID_DEVICE);
            return ProtocolAction::None;
        };
        let _ = write!(response, "TD{}={}", device, store.transit_delay(device));
        return ProtocolAction::None;
    }

    if line.starts_with("CLR") {
        store.clear();
        let _ = response.push_str("OK");
        return ProtocolAction::ConfigChanged;
    }

    if line.starts_with("SAV") {
        match store.save(nv) {
            Ok(()) => {
                let _ = response.push_str("OK");
            }
            Err(_) => {
                let _ = response.push_str(ERR_SAVE_FAILED);
            }
        }
        return ProtocolAction::None;
    }

    if let Some(rest) = line.strip_prefix("GPR") {
        let Some(device) = parse_int_prefix(rest) else {
            format_error(response, "GPR");
            return ProtocolAction::None;
        };
        let Some(device) = check_device(device, store.count()) else {
            let _ = response.push_str(ERR_INVALID_DEVICE);
            return ProtocolAction::None;
        };
        let _ = write!(
            response,
            "PR{},{},{},{},{},{},{}",
            device,
            store.channel(device),
            store.digital_input(device),
            store.pos_open(device),
            store.pos_closed(device),
            store.transit_delay(device),
            store.label(device)
        );
        return ProtocolAction::None;
    }

    if let Some(rest) = line.strip_prefix("SPR") {
        return process_spr(rest, store, response);
    }

    if let Some(rest) = line.strip_prefix("SST") {
        let mut it = rest.splitn(2, ',');
        let (Some(dev_field), Some(state_field)) = (it.next(), it.next()) else {
            format_error(response, "SST");
            return ProtocolAction::None;
        };
        let (Some(device), Some(state)) = (
            parse_int_prefix(dev_field),
            parse_int_prefix(state_field),
        ) else {
            format_error(response, "SST");
            return ProtocolAction::None;
        };
        let Some(device) = check_device(device, store.count()) else {
            let _ = response.push_str(ERR_INVALID_DEVICE);
            return ProtocolAction::None;
        };
        let Some(state) = i8::try_from(state).ok().and_then(ShutterState::from_wire) else {
            let _ = response.push_str(ERR_INVALID_STATE);
            return ProtocolAction::None;
        };
        let _ = response.push_str("OK");
        return ProtocolAction::StateChange { device, state };
    }

    if let Some(rest) = line.strip_prefix("SSP") {
        let mut it = rest.splitn(2, ',');
        let (Some(dev_field), Some(pos_field)) = (it.next(), it.next()) else {
            format_error(response, "SSP");
            return ProtocolAction::None;
        };
        let (Some(device), Some(value)) = (
            parse_int_prefix(dev_field),
            parse_int_prefix(pos_field).and_then(|v| u16::try_from(v).ok()),
        ) else {
            format_error(response, "SSP");
            return ProtocolAction::None;
        };
        let Some(device) = check_device(device, store.count()) else {
            let _ = response.push_str(ERR_INVALID_DEVICE);
            return ProtocolAction::None;
        };
        let _ = response.push_str("OK");
        // No upper bound on the value; the drive variant interprets it
        return ProtocolAction::ManualPosition { device, value };
    }

    let _ = response.push_str(ERR_UNRECOGNIZED);
    ProtocolAction::None
}

/// `SPR<d>,<ch>,<din>,<openPos>,<closedPos>,<delay>,<label>`
fn process_spr(
    rest: &str,
    store: &mut ConfigStore,
    response: &mut Response,
) -> ProtocolAction {
    let mut fields: [&str; 7] = [""; 7];
    let mut n = 0;
    for field in rest.split(',') {
        if n < 7 {
            fields[n] = field;
        }
        n += 1;
    }
    if n != 7 {
        format_error(response, "SPR");
        return ProtocolAction::None;
    }

    let parsed = (
        fields[0].parse::<i32>(),
        fields[1].parse::<u8>(),
        fields[2].parse::<i8>(),
        fields[3].parse::<u16>(),
        fields[4].parse::<u16>(),
        fields[5].parse::<u16>(),
    );
    let (Ok(device), Ok(channel), Ok(digital_input), Ok(pos_open), Ok(pos_closed), Ok(delay)) =
        parsed
    else {
        format_error(response, "SPR");
        return ProtocolAction::None;
    };

    // -1 appends a new shutter, as does addressing the first undefined
    // index; other negatives cannot address anything
    let index = match device {
        -1 => None,
        d if d >= 0 && d as usize == store.count() => None,
        d if d >= 0 => Some(d as usize),
        _ => {
            let _ = response.push_str(ERR_SET_FAILED);
            return ProtocolAction::None;
        }
    };

    match store.set(
        index,
        channel,
        digital_input,
        pos_open,
        pos_closed,
        delay,
        fields[6],
    ) {
        Ok(_) => {
            let _ = response.push_str("OK");
            ProtocolAction::ConfigChanged
        }
        Err(_) => {
            let _ = response.push_str(ERR_SET_FAILED);
            ProtocolAction::None
        }
    }
}
