//! Device orchestrator: request resolution and logical state ownership
//!
//! The orchestrator is the single writer of shutter logical state. Each
//! cycle it collects state-change requests from the three sources (debounced
//! digital inputs, serial protocol, display UI), resolves conflicts by
//! source priority, and emits the drive commands the firmware loop sends to
//! the actuator board and display.
//!
//! Conflicting requests for the same shutter within one cycle resolve as
//! digital input > serial protocol > UI: a manual switch must not be
//! overridden by a stale UI touch. The losing request is discarded without
//! error.

use crate::actuator::ShutterState;
use crate::config::{ConfigStore, MAX_SHUTTERS};
use crate::display::DisplayInterface;
use crate::protocol::ProtocolAction;
use heapless::Vec;

/// Where a state-change request originated. Declaration order is priority
/// order, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum RequestSource {
    /// Physical switch via the debounce engine
    DigitalInput,
    /// Host command via the serial protocol
    Serial,
    /// On-device display touch/button
    Ui,
}

/// A single state-change request for one shutter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Request {
    /// Drive to a logical end state
    State(ShutterState),
    /// Drive a raw actuation value (manual position, no feedback)
    Manual(u16),
}

/// When the orchestrator schedules a zero-value release after a drive
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseAfter {
    /// Never release automatically
    Never,
    /// Release after a fixed idle interval (servo hold disengage)
    IdleMs(u64),
    /// Release each shutter its transit delay after the drive; solenoid
    /// drives have no position feedback, so the configured transit time
    /// bounds how long the coil pushes
    TransitDelay,
}

/// One resolved actuator command for the firmware loop to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveCommand {
    /// Logical shutter index
    pub device: usize,
    /// Actuator board output channel
    pub channel: u8,
    /// Raw drive value (pulse-width ticks or solenoid force)
    pub value: u16,
    /// Logical state to record and show after the drive
    pub new_state: ShutterState,
}

/// Per-cycle request collector and logical state table.
pub struct Orchestrator {
    states: Vec<ShutterState, MAX_SHUTTERS>,
    pending: [Option<(RequestSource, Request)>; MAX_SHUTTERS],
    last_drive_ms: [u64; MAX_SHUTTERS],
    engaged: [bool; MAX_SHUTTERS],
    release_after: ReleaseAfter,
}

impl Orchestrator {
    pub fn new(release_after: ReleaseAfter) -> Self {
        Self {
            states: Vec::new(),
            pending: [None; MAX_SHUTTERS],
            last_drive_ms: [0; MAX_SHUTTERS],
            engaged: [false; MAX_SHUTTERS],
            release_after,
        }
    }

    /// Logical states, indexed like the configuration store.
    pub fn states(&self) -> &[ShutterState] {
        &self.states
    }

    /// Re-synchronize with the store after a configuration change.
    ///
    /// All logical states reset to Undefined and pending requests are
    /// dropped; the physical positions are unknown after a reconfigure.
    pub fn sync_config(&mut self, store: &ConfigStore) {
        self.states.clear();
        for _ in 0..store.count() {
            // Capacity matches MAX_SHUTTERS, cannot fail
            let _ = self.states.push(ShutterState::Undefined);
        }
        self.pending = [None; MAX_SHUTTERS];
        self.engaged = [false; MAX_SHUTTERS];
    }

    /// Push device count and labels to the display and request a redraw.
    pub fn sync_display<D: DisplayInterface>(&self, store: &ConfigStore, display: &mut D) {
        display.set_device_count(store.count());
        for device in 0..store.count() {
            display.set_device_label(device, store.label(device));
        }
        display.refresh_all();
    }

    /// Submit one request; returns whether it is now pending.
    ///
    /// A pending request is only displaced by a strictly higher-priority
    /// source. Requests for undefined devices are dropped.
    pub fn submit(&mut self, source: RequestSource, device: usize, request: Request) -> bool {
        if device >= self.states.len() {
            return false;
        }
        match self.pending[device] {
            None => {
                self.pending[device] = Some((source, request));
                true
            }
            Some((existing, _)) if source < existing => {
                self.pending[device] = Some((source, request));
                true
            }
            Some(_) => false,
        }
    }

    /// Map a settled digital-input vector to per-shutter requests.
    ///
    /// Each configured shutter with a mapped input line derives its desired
    /// state from the settled bit value (high = open).
    pub fn apply_inputs(&mut self, settled_bits: u8, store: &ConfigStore) {
        for device in 0..store.count() {
            let input = store.digital_input(device);
            if input < 0 || input as usize >= 8 {
                continue;
            }
            let desired = if settled_bits & (1u8 << input) != 0 {
                ShutterState::Open
            } else {
                ShutterState::Closed
            };
            self.submit(RequestSource::DigitalInput, device, Request::State(desired));
        }
    }

    /// Translate a decoded protocol action into a serial-sourced request.
    ///
    /// `ConfigChanged` is not handled here; the caller re-synchronizes via
    /// [`Orchestrator::sync_config`] and [`Orchestrator::sync_display`].
    pub fn apply_action(&mut self, action: ProtocolAction) {
        match action {
            ProtocolAction::StateChange { device, state } => {
                self.submit(RequestSource::Serial, device, Request::State(state));
            }
            ProtocolAction::ManualPosition { device, value } => {
                self.submit(RequestSource::Serial, device, Request::Manual(value));
            }
            ProtocolAction::None | ProtocolAction::ConfigChanged => {}
        }
    }

    /// Submit a UI-originated request from the display poll.
    pub fn apply_ui(&mut self, device: usize, state: ShutterState) {
        self.submit(RequestSource::Ui, device, Request::State(state));
    }

    /// Commit every pending request: emit drive commands and update the
    /// logical state table. Pending requests are consumed.
    pub fn resolve(&mut self, store: &ConfigStore, now_ms: u64) -> Vec<DriveCommand, MAX_SHUTTERS> {
        let mut commands = Vec::new();
        for device in 0..self.states.len() {
            let Some((_, request)) = self.pending[device].take() else {
                continue;
            };
            let (value, new_state) = match request {
                Request::State(ShutterState::Open) => {
                    (store.pos_open(device), ShutterState::Open)
                }
                Request::State(ShutterState::Closed) => {
                    (store.pos_closed(device), ShutterState::Closed)
                }
                // An Undefined target is never submitted
                Request::State(ShutterState::Undefined) => continue,
                Request::Manual(value) => (value, ShutterState::Undefined),
            };
            self.states[device] = new_state;
            self.last_drive_ms[device] = now_ms;
            self.engaged[device] = true;
            let _ = commands.push(DriveCommand {
                device,
                channel: store.channel(device),
                value,
                new_state,
            });
        }
        commands
    }

    /// Emit zero-value drive commands for shutters whose release interval
    /// elapsed since the last drive. Logical state is unchanged.
    pub fn pending_releases(
        &mut self,
        store: &ConfigStore,
        now_ms: u64,
    ) -> Vec<DriveCommand, MAX_SHUTTERS> {
        let mut commands = Vec::new();
        for device in 0..self.states.len() {
            if !self.engaged[device] {
                continue;
            }
            let interval_ms = match self.release_after {
                ReleaseAfter::Never => return commands,
                ReleaseAfter::IdleMs(ms) => ms,
                ReleaseAfter::TransitDelay => store.transit_delay(device) as u64,
            };
            if now_ms.saturating_sub(self.last_drive_ms[device]) < interval_ms {
                continue;
            }
            self.engaged[device] = false;
            let _ = commands.push(DriveCommand {
                device,
                channel: store.channel(device),
                value: 0,
                new_state: self.states[device],
            });
        }
        commands
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::MockDisplay;

    fn store_with(count: usize) -> ConfigStore {
        let mut store = ConfigStore::new();
        for i in 0..count {
            store
                .set(None, i as u8, if i == 0 { 0 } else { -1 }, 150, 600, 1200, "Sh")
                .unwrap();
        }
        store
    }

    fn orchestrator_for(store: &ConfigStore) -> Orchestrator {
        let mut orch = Orchestrator::new(ReleaseAfter::Never);
        orch.sync_config(store);
        orch
    }

    #[test]
    fn test_sync_config_resets_states() {
        let store = store_with(3);
        let orch = orchestrator_for(&store);
        assert_eq!(orch.states().len(), 3);
        assert!(orch
            .states()
            .iter()
            .all(|&s| s == ShutterState::Undefined));
    }

    #[test]
    fn test_resolve_maps_end_positions() {
        let store = store_with(2);
        let mut orch = orchestrator_for(&store);
        orch.submit(
            RequestSource::Serial,
            0,
            Request::State(ShutterState::Open),
        );
        orch.submit(
            RequestSource::Serial,
            1,
            Request::State(ShutterState::Closed),
        );

        let commands = orch.resolve(&store, 0);
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].value, 150);
        assert_eq!(commands[0].channel, 0);
        assert_eq!(commands[1].value, 600);
        assert_eq!(orch.states()[0], ShutterState::Open);
        assert_eq!(orch.states()[1], ShutterState::Closed);
    }

    #[test]
    fn test_digital_input_beats_serial() {
        let store = store_with(1);
        let mut orch = orchestrator_for(&store);

        // Serial first, digital input second: input displaces it
        orch.apply_action(ProtocolAction::StateChange {
            device: 0,
            state: ShutterState::Closed,
        });
        orch.apply_inputs(0b0001, &store);

        let commands = orch.resolve(&store, 0);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].new_state, ShutterState::Open);
    }

    #[test]
    fn test_serial_cannot_displace_digital_input() {
        let store = store_with(1);
        let mut orch = orchestrator_for(&store);

        orch.apply_inputs(0b0000, &store);
        orch.apply_action(ProtocolAction::StateChange {
            device: 0,
            state: ShutterState::Open,
        });

        let commands = orch.resolve(&store, 0);
        assert_eq!(commands.len(), 1);
        // The serial request was discarded without error
        assert_eq!(commands[0].new_state, ShutterState::Closed);
    }

    #[test]
    fn test_ui_loses_to_serial() {
        let store = store_with(1);
        let mut orch = orchestrator_for(&store);

        orch.apply_ui(0, ShutterState::Open);
        orch.apply_action(ProtocolAction::StateChange {
            device: 0,
            state: ShutterState::Closed,
        });

        let commands = orch.resolve(&store, 0);
        assert_eq!(commands[0].new_state, ShutterState::Closed);
    }

    #[test]
    fn test_manual_position_drives_raw_value() {
        let store = store_with(1);
        let mut orch = orchestrator_for(&store);
        orch.apply_action(ProtocolAction::ManualPosition {
            device: 0,
            value: 4095,
        });

        let commands = orch.resolve(&store, 0);
        assert_eq!(commands[0].value, 4095);
        assert_eq!(commands[0].new_state, ShutterState::Undefined);
        assert_eq!(orch.states()[0], ShutterState::Undefined);
    }

    #[test]
    fn test_submit_out_of_range_dropped() {
        let store = store_with(1);
        let mut orch = orchestrator_for(&store);
        assert!(!orch.submit(
            RequestSource::Serial,
            5,
            Request::State(ShutterState::Open)
        ));
        assert!(orch.resolve(&store, 0).is_empty());
    }

    #[test]
    fn test_unmapped_input_lines_ignored() {
        let store = store_with(2); // only device 0 has an input line
        let mut orch = orchestrator_for(&store);
        orch.apply_inputs(0b0011, &store);

        let commands = orch.resolve(&store, 0);
        assert_eq!(commands.len(), 1);
        assert_eq!(commands[0].device, 0);
    }

    #[test]
    fn test_idle_release_after_interval() {
        let store = store_with(1);
        let mut orch = Orchestrator::new(ReleaseAfter::IdleMs(1000));
        orch.sync_config(&store);

        orch.submit(
            RequestSource::Serial,
            0,
            Request::State(ShutterState::Open),
        );
        orch.resolve(&store, 0);

        assert!(orch.pending_releases(&store, 999).is_empty());
        let releases = orch.pending_releases(&store, 1000);
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].value, 0);
        assert_eq!(releases[0].new_state, ShutterState::Open);
        // One-shot until the next drive
        assert!(orch.pending_releases(&store, 2000).is_empty());
    }

    #[test]
    fn test_release_after_transit_delay() {
        let store = store_with(1); // transit delay 1200 ms
        let mut orch = Orchestrator::new(ReleaseAfter::TransitDelay);
        orch.sync_config(&store);

        orch.submit(
            RequestSource::Serial,
            0,
            Request::State(ShutterState::Closed),
        );
        orch.resolve(&store, 100);

        assert!(orch.pending_releases(&store, 1299).is_empty());
        let releases = orch.pending_releases(&store, 1300);
        assert_eq!(releases.len(), 1);
        assert_eq!(releases[0].value, 0);
        assert_eq!(orch.states()[0], ShutterState::Closed);
    }

    #[test]
    fn test_never_policy_skips_releases() {
        let store = store_with(1);
        let mut orch = orchestrator_for(&store);
        orch.submit(
            RequestSource::Serial,
            0,
            Request::State(ShutterState::Open),
        );
        orch.resolve(&store, 0);
        assert!(orch.pending_releases(&store, u64::MAX).is_empty());
    }

    #[test]
    fn test_sync_display_pushes_count_and_labels() {
        let store = store_with(2);
        let orch = orchestrator_for(&store);
        let mut display = MockDisplay::new();
        orch.sync_display(&store, &mut display);
        assert_eq!(display.device_count, 2);
        assert_eq!(display.refreshes, 1);
    }
}
