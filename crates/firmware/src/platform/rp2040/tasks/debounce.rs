//! Digital input debounce task
//!
//! Owns the input pins and the shared debounce engine. The task sleeps on
//! the pins until any edge fires, then drives the engine with periodic
//! samples until every monitored line settles. The main loop picks up the
//! settled input vector through [`poll_settled`].
//!
//! The engine sits behind a critical-section mutex because `poll_settled`
//! runs on the main loop while the task mutates the engine.

use core::cell::RefCell;
use critical_section::Mutex;
use embassy_futures::select::select_array;
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};
use pico_shutter_core::debounce::{
    DebounceEngine, EdgeAction, TickAction, DEBOUNCE_INTERVAL_MS, NUM_INPUTS,
};

static DEBOUNCE: Mutex<RefCell<DebounceEngine>> = Mutex::new(RefCell::new(DebounceEngine::new()));

/// Read the live input lines into a bit-per-input mask.
fn read_mask(inputs: &[Input<'static>; NUM_INPUTS]) -> u8 {
    let mut mask = 0;
    for (bit, input) in inputs.iter().enumerate() {
        if input.is_high() {
            mask |= 1 << bit;
        }
    }
    mask
}

/// Atomically fetch a pending settled input vector, if any.
pub fn poll_settled() -> Option<u8> {
    critical_section::with(|cs| DEBOUNCE.borrow_ref_mut(cs).check_state())
}

/// Debounce task: edge wait plus timed sampling
///
/// Pin order defines the bit order of the input vector, which the
/// configuration records reference by index.
#[embassy_executor::task]
pub async fn debounce_task(mut inputs: [Input<'static>; NUM_INPUTS]) {
    crate::log_info!("Debounce task started ({} inputs)", NUM_INPUTS);

    loop {
        {
            let edge_waits = inputs.each_mut().map(|pin| pin.wait_for_any_edge());
            select_array(edge_waits).await;
        }

        let raw = read_mask(&inputs);
        let action = critical_section::with(|cs| DEBOUNCE.borrow_ref_mut(cs).on_edge(raw));
        if action != EdgeAction::StartSampling {
            continue;
        }

        let mut ticker = Ticker::every(Duration::from_millis(DEBOUNCE_INTERVAL_MS));
        loop {
            ticker.next().await;
            let raw = read_mask(&inputs);
            let action = critical_section::with(|cs| DEBOUNCE.borrow_ref_mut(cs).on_tick(raw));
            if action == TickAction::Settled {
                break;
            }
        }
    }
}
