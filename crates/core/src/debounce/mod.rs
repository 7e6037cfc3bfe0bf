//! Debounce engine for physical digital inputs
//!
//! A two-state machine over a fixed ring of raw input samples:
//!
//! - **Idle**: only edge interrupts are active. Any edge on a monitored
//!   line enters Sampling and tells the caller to arm the periodic timer
//!   and suppress further edge interrupts.
//! - **Sampling**: each timer tick records the raw input mask into the
//!   ring and recomputes, across the full ring, which bits agree high and
//!   which agree low. Once every monitored bit has settled one way or the
//!   other, the engine flags settlement, returns to Idle, and tells the
//!   caller to stop the timer and re-enable edge interrupts.
//!
//! Requiring a full ring of agreement, not a single match, rejects input
//! chatter that oscillates at a period close to the sampling interval. The
//! entry recorded on the edge itself is the *complement* of the live mask,
//! which forces at least one complete ring cycle before settlement.
//!
//! This module is pure logic; the firmware crate owns the interrupt and
//! timer plumbing and wraps the engine in a critical-section mutex, since
//! the sample ring and settled flag are shared with interrupt context.

/// Number of monitored input lines
pub const NUM_INPUTS: usize = 4;

/// Bit mask covering all monitored lines
pub const MONITORED_MASK: u8 = (1 << NUM_INPUTS) - 1;

/// Ring length: samples that must agree before a line counts as settled.
///
/// A ring length of 1 with a zero interval degenerates to no debouncing.
pub const DEBOUNCE_CHECKS: usize = 10;

/// Sampling interval in milliseconds while in the Sampling state
pub const DEBOUNCE_INTERVAL_MS: u64 = 5;

/// What the edge handler must do after feeding the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeAction {
    /// Suppress edge interrupts and arm the periodic sampling timer
    StartSampling,
    /// Edge arrived while already sampling; nothing to do
    Ignore,
}

/// What the timer handler must do after feeding the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickAction {
    /// Keep the timer running for another interval
    Continue,
    /// All lines settled: stop the timer and re-enable edge interrupts
    Settled,
}

/// Debounce engine state machine.
///
/// Written only from the edge/timer handlers; read-and-cleared through
/// [`DebounceEngine::check_state`] from the orchestrator loop. All
/// cross-context access must happen inside a critical section.
#[derive(Debug)]
pub struct DebounceEngine {
    ring: [u8; DEBOUNCE_CHECKS],
    index: usize,
    sampling: bool,
    /// Bits that are 1 in every ring entry (settled high)
    high_settled: u8,
    /// Bits that are 0 in every ring entry (settled low)
    low_settled: u8,
    settled: bool,
}

impl Default for DebounceEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl DebounceEngine {
    /// Create an engine in the Idle state. Const so the firmware can place
    /// the engine in a static mutex.
    pub const fn new() -> Self {
        Self {
            ring: [0; DEBOUNCE_CHECKS],
            index: 0,
            sampling: false,
            high_settled: 0,
            low_settled: 0,
            settled: false,
        }
    }

    /// Feed an edge event with the live input mask.
    ///
    /// Records the complemented mask so the settle check cannot pass until
    /// a full ring of fresh samples has been taken.
    pub fn on_edge(&mut self, raw_mask: u8) -> EdgeAction {
        if self.sampling {
            return EdgeAction::Ignore;
        }
        self.sampling = true;
        self.ring[self.index] = !raw_mask & MONITORED_MASK;
        self.index = (self.index + 1) % DEBOUNCE_CHECKS;
        EdgeAction::StartSampling
    }

    /// Feed one periodic timer tick with the live input mask.
    pub fn on_tick(&mut self, raw_mask: u8) -> TickAction {
        self.ring[self.index] = raw_mask & MONITORED_MASK;
        self.index = (self.index + 1) % DEBOUNCE_CHECKS;

        let mut high = MONITORED_MASK;
        let mut low = MONITORED_MASK;
        for sample in &self.ring {
            high &= sample;
            low &= !sample;
        }
        self.high_settled = high;
        self.low_settled = low;

        if (high | low) & MONITORED_MASK == MONITORED_MASK {
            self.settled = true;
            self.sampling = false;
            TickAction::Settled
        } else {
            TickAction::Continue
        }
    }

    /// Atomically read and clear the settled flag.
    ///
    /// Returns the settled-high bits as a compact bit-per-input vector when
    /// a settlement is pending, `None` otherwise (output untouched). The
    /// caller wraps this in a critical section.
    pub fn check_state(&mut self) -> Option<u8> {
        if self.settled {
            self.settled = false;
            Some(self.high_settled & MONITORED_MASK)
        } else {
            None
        }
    }

    /// Whether the engine is currently in the Sampling state.
    pub fn is_sampling(&self) -> bool {
        self.sampling
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Run ticks with a steady mask until settled, bounded to catch hangs.
    fn settle(engine: &mut DebounceEngine, mask: u8) -> usize {
        for tick in 1..=4 * DEBOUNCE_CHECKS {
            if engine.on_tick(mask) == TickAction::Settled {
                return tick;
            }
            assert_eq!(engine.check_state(), None);
        }
        panic!("engine never settled");
    }

    #[test]
    fn test_edge_starts_sampling_once() {
        let mut engine = DebounceEngine::new();
        assert_eq!(engine.on_edge(0b0001), EdgeAction::StartSampling);
        assert!(engine.is_sampling());
        assert_eq!(engine.on_edge(0b0001), EdgeAction::Ignore);
    }

    #[test]
    fn test_steady_input_settles_after_full_ring() {
        let mut engine = DebounceEngine::new();
        engine.on_edge(0b0101);
        // The complemented edge entry must be overwritten before the ring
        // can agree, so settlement takes a full ring of ticks.
        let ticks = settle(&mut engine, 0b0101);
        assert_eq!(ticks, DEBOUNCE_CHECKS);
        assert_eq!(engine.check_state(), Some(0b0101));
        assert!(!engine.is_sampling());
    }

    #[test]
    fn test_check_state_fires_exactly_once() {
        let mut engine = DebounceEngine::new();
        engine.on_edge(0b0010);
        settle(&mut engine, 0b0010);
        assert_eq!(engine.check_state(), Some(0b0010));
        assert_eq!(engine.check_state(), None);
    }

    #[test]
    fn test_chatter_defers_settlement() {
        let mut engine = DebounceEngine::new();
        engine.on_edge(0b0001);

        // Toggle faster than the sampling interval: no settlement, and
        // every intermediate poll reports nothing.
        for tick in 0..3 * DEBOUNCE_CHECKS {
            let mask = if tick % 2 == 0 { 0b0001 } else { 0b0000 };
            assert_eq!(engine.on_tick(mask), TickAction::Continue);
            assert_eq!(engine.check_state(), None);
        }

        // Hold steady: settles after one full ring cycle, reported once.
        let ticks = settle(&mut engine, 0b0001);
        assert_eq!(ticks, DEBOUNCE_CHECKS);
        assert_eq!(engine.check_state(), Some(0b0001));
        assert_eq!(engine.check_state(), None);
    }

    #[test]
    fn test_all_lines_low_settles() {
        let mut engine = DebounceEngine::new();
        engine.on_edge(0b0000);
        settle(&mut engine, 0b0000);
        assert_eq!(engine.check_state(), Some(0b0000));
    }

    #[test]
    fn test_unmonitored_bits_ignored() {
        let mut engine = DebounceEngine::new();
        engine.on_edge(0xF0);
        settle(&mut engine, 0xF5);
        // Bits above the monitored mask never reach the output
        assert_eq!(engine.check_state(), Some(0b0101));
    }
}
