//! Display collaborator interface
//!
//! On-device displays (TFT touch panel, LCD with buttons) are external
//! collaborators: rendering and input decoding are not part of this crate.
//! This module fixes the interface they present to the orchestrator, which
//! has the same shape for touch- and button-based implementations.

use crate::actuator::ShutterState;

/// Interface presented by a display collaborator.
///
/// The orchestrator is the only caller of the update operations, and polls
/// [`DisplayInterface::poll_input`] once per cycle for UI-originated
/// requests.
pub trait DisplayInterface {
    /// Announce how many devices are configured.
    fn set_device_count(&mut self, count: usize);

    /// Set the label text shown for one device.
    fn set_device_label(&mut self, device: usize, label: &str);

    /// Redraw everything (after a configuration change).
    fn refresh_all(&mut self);

    /// Redraw one device row.
    fn refresh_device(&mut self, device: usize);

    /// Update the state indicator for one device.
    fn set_device_visual_state(&mut self, device: usize, state: ShutterState);

    /// Poll for a UI-originated request; `None` when the user did nothing.
    fn poll_input(&mut self) -> Option<(usize, ShutterState)>;
}

/// No-op display for headless builds.
#[derive(Debug, Default)]
pub struct NullDisplay;

impl DisplayInterface for NullDisplay {
    fn set_device_count(&mut self, _count: usize) {}

    fn set_device_label(&mut self, _device: usize, _label: &str) {}

    fn refresh_all(&mut self) {}

    fn refresh_device(&mut self, _device: usize) {}

    fn set_device_visual_state(&mut self, _device: usize, _state: ShutterState) {}

    fn poll_input(&mut self) -> Option<(usize, ShutterState)> {
        None
    }
}

/// Scripted display for host tests: records update calls and feeds queued
/// input requests to the orchestrator.
#[derive(Debug, Default)]
pub struct MockDisplay {
    /// Queued UI requests, returned one per poll
    queued: heapless::Deque<(usize, ShutterState), 8>,
    /// Last announced device count
    pub device_count: usize,
    /// Visual state updates seen, in order
    pub state_updates: heapless::Vec<(usize, ShutterState), 16>,
    /// Number of full refreshes requested
    pub refreshes: usize,
}

impl MockDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a UI request for the next poll.
    pub fn queue_input(&mut self, device: usize, state: ShutterState) {
        let _ = self.queued.push_back((device, state));
    }
}

impl DisplayInterface for MockDisplay {
    fn set_device_count(&mut self, count: usize) {
        self.device_count = count;
    }

    fn set_device_label(&mut self, _device: usize, _label: &str) {}

    fn refresh_all(&mut self) {
        self.refreshes += 1;
    }

    fn refresh_device(&mut self, _device: usize) {}

    fn set_device_visual_state(&mut self, device: usize, state: ShutterState) {
        let _ = self.state_updates.push((device, state));
    }

    fn poll_input(&mut self) -> Option<(usize, ShutterState)> {
        self.queued.pop_front()
    }
}
