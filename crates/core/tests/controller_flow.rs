//! End-to-end controller flow over the mock platform traits
//!
//! Drives configuration, persistence, and state changes through the same
//! path the firmware main loop uses: protocol line in, orchestrator cycle,
//! drive commands out.

use pico_shutter_core::actuator::ShutterState;
use pico_shutter_core::config::ConfigStore;
use pico_shutter_core::display::{DisplayInterface, MockDisplay};
use pico_shutter_core::orchestrator::{DriveCommand, Orchestrator, ReleaseAfter};
use pico_shutter_core::protocol::{process_line, ProtocolAction, Response};
use pico_shutter_core::traits::{MockNvStorage, MockTime, TimeSource};

/// Everything the firmware main loop owns, on mocks.
struct Controller {
    store: ConfigStore,
    nv: MockNvStorage,
    time: MockTime,
    display: MockDisplay,
    orchestrator: Orchestrator,
}

impl Controller {
    fn new() -> Self {
        Self {
            store: ConfigStore::new(),
            nv: MockNvStorage::new(),
            time: MockTime::new(),
            display: MockDisplay::new(),
            orchestrator: Orchestrator::new(ReleaseAfter::Never),
        }
    }

    /// Feed one command line, mirroring the main loop's dispatch.
    fn command(&mut self, line: &str) -> String {
        let mut response = Response::new();
        let action = process_line(
            line.as_bytes(),
            &mut self.store,
            self.orchestrator.states(),
            &mut self.nv,
            self.time.now_ms(),
            &mut response,
        );
        match action {
            ProtocolAction::ConfigChanged => {
                self.orchestrator.sync_config(&self.store);
                self.orchestrator
                    .sync_display(&self.store, &mut self.display);
            }
            other => self.orchestrator.apply_action(other),
        }
        response.as_str().to_string()
    }

    /// Run one resolution cycle and apply the display updates.
    fn cycle(&mut self) -> Vec<DriveCommand> {
        if let Some((device, state)) = self.display.poll_input() {
            self.orchestrator.apply_ui(device, state);
        }
        let commands = self
            .orchestrator
            .resolve(&self.store, self.time.now_ms());
        for command in &commands {
            self.display
                .set_device_visual_state(command.device, command.new_state);
        }
        commands.iter().copied().collect()
    }
}

#[test]
fn test_configure_save_reload_and_drive() {
    let mut controller = Controller::new();

    assert_eq!(
        controller.command("SPR0,2,-1,150,600,1500,Kitchen"),
        "OK"
    );
    assert_eq!(controller.command("SPR1,3,0,200,550,1200,Lab"), "OK");
    assert_eq!(controller.command("GND"), "ND=2");
    assert_eq!(controller.command("SAV"), "OK");

    // A fresh controller over the same storage sees the saved setup
    let nv = controller.nv;
    let mut controller = Controller {
        nv,
        ..Controller::new()
    };
    controller.store.load(&mut controller.nv).unwrap();
    controller.orchestrator.sync_config(&controller.store);

    assert_eq!(controller.command("GPR0"), "PR0,2,-1,150,600,1500,Kitchen");
    assert_eq!(controller.command("GST1"), "ST1=-1");

    // Open shutter 0 and verify the drive command it produces
    assert_eq!(controller.command("SST0,1"), "OK");
    let commands = controller.cycle();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].channel, 2);
    assert_eq!(commands[0].value, 150);
    assert_eq!(commands[0].new_state, ShutterState::Open);

    assert_eq!(controller.command("GST0"), "ST0=1");
    assert_eq!(
        controller.display.state_updates.as_slice(),
        &[(0, ShutterState::Open)]
    );
}

#[test]
fn test_clear_resets_states_and_display() {
    let mut controller = Controller::new();
    controller.command("SPR0,0,-1,100,500,1000,One");
    controller.command("SST0,1");
    controller.cycle();

    assert_eq!(controller.command("CLR"), "OK");
    assert_eq!(controller.command("GND"), "ND=0");
    assert!(controller.orchestrator.states().is_empty());
    assert_eq!(controller.display.device_count, 0);
    // Cleared but not saved: stored count byte is untouched
    assert_eq!(controller.command("GST0"), "Error: Invalid device number.");
}

#[test]
fn test_ui_request_flows_through_cycle() {
    let mut controller = Controller::new();
    controller.command("SPR0,1,-1,120,480,900,Door");

    controller.display.queue_input(0, ShutterState::Closed);
    let commands = controller.cycle();
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].value, 480);
    assert_eq!(controller.orchestrator.states()[0], ShutterState::Closed);
}

#[test]
fn test_uptime_report_follows_time_source() {
    let mut controller = Controller::new();
    controller.time.advance_ms(1234);
    assert_eq!(controller.command("GTI"), "TI=1234");
}
