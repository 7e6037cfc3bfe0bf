//! Shutter controller firmware entry point
//!
//! Wires the RP2040 peripherals to the platform abstractions, restores the
//! shutter configuration from flash, initializes the actuator board, and
//! runs the orchestrator loop. Input debouncing runs as its own task.

#![no_std]
#![no_main]

use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_rp::bind_interrupts;
use embassy_rp::flash::Flash;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::i2c::I2c;
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart};
use embassy_time::{Duration, Ticker, Timer};
use static_cell::StaticCell;

use pico_shutter_core::actuator::{DriveError, ShutterDrive};
use pico_shutter_core::config::ConfigStore;
use pico_shutter_core::display::{DisplayInterface, NullDisplay};
use pico_shutter_core::orchestrator::Orchestrator;
use pico_shutter_core::protocol::ProtocolAction;
use pico_shutter_core::traits::TimeSource;

use pico_shutter_firmware::actuators::{ActuatorKind, ShutterActuator};
use pico_shutter_firmware::comm::SerialComm;
use pico_shutter_firmware::platform::rp2040::flash::FLASH_SIZE;
use pico_shutter_firmware::platform::rp2040::tasks::{debounce_task, poll_settled};
use pico_shutter_firmware::platform::rp2040::{Rp2040Flash, Rp2040I2c, Rp2040Uart};
use pico_shutter_firmware::platform::EmbassyTime;
use pico_shutter_firmware::storage::{FlashNv, CONFIG_SECTOR_BASE};
use pico_shutter_firmware::{log_error, log_info, log_warn};

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
});

/// Actuator hardware this build drives
const ACTUATOR_KIND: ActuatorKind = ActuatorKind::RcServo;

/// Main loop cadence
const LOOP_INTERVAL_MS: u64 = 20;

static UART_TX_BUF: StaticCell<[u8; 64]> = StaticCell::new();
static UART_RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Default::default());
    log_info!("pico_shutter starting");

    // Command channel on UART0, 9600 8N1
    let mut uart_config = embassy_rp::uart::Config::default();
    uart_config.baudrate = 9600;
    let uart = BufferedUart::new(
        p.UART0,
        Irqs,
        p.PIN_0,
        p.PIN_1,
        UART_TX_BUF.init([0; 64]),
        UART_RX_BUF.init([0; 256]),
        uart_config,
    );
    let mut serial = SerialComm::new(Rp2040Uart::new(uart));

    // Actuator board bus on I2C0
    let i2c = I2c::new_blocking(p.I2C0, p.PIN_5, p.PIN_4, embassy_rp::i2c::Config::default());
    let mut actuator = ShutterActuator::new(ACTUATOR_KIND, Rp2040I2c::new(i2c));

    // Configuration sector in on-board flash
    let flash = Flash::<_, _, FLASH_SIZE>::new_blocking(p.FLASH);
    let mut nv = FlashNv::new(Rp2040Flash::new(flash), CONFIG_SECTOR_BASE);

    let mut store = ConfigStore::new();
    match store.load(&mut nv) {
        Ok(()) => log_info!("Configuration restored, {} shutters", store.count()),
        Err(_) => log_warn!("No stored configuration, starting empty"),
    }

    if let Err(e) = actuator.init() {
        // Without a verified board nothing can move; stay up for diagnostics
        loop {
            match e {
                DriveError::BoardNotFound => {
                    log_error!("Actuator board not found, check wiring and address")
                }
                _ => log_error!("Actuator board init failed on the bus"),
            }
            Timer::after(Duration::from_secs(5)).await;
        }
    }
    log_info!("Actuator board initialized");

    // Debounced switch inputs, bit order matches the configured indices
    let inputs = [
        Input::new(p.PIN_10, Pull::Up),
        Input::new(p.PIN_11, Pull::Up),
        Input::new(p.PIN_12, Pull::Up),
        Input::new(p.PIN_13, Pull::Up),
    ];
    spawner.spawn(debounce_task(inputs)).unwrap();

    let time = EmbassyTime;
    let mut display = NullDisplay;
    let mut orchestrator = Orchestrator::new(actuator.release_policy());
    orchestrator.sync_config(&store);
    orchestrator.sync_display(&store, &mut display);

    let mut ticker = Ticker::every(Duration::from_millis(LOOP_INTERVAL_MS));
    loop {
        let now = time.now_ms();

        match serial.poll(&mut store, orchestrator.states(), &mut nv, now) {
            Ok(ProtocolAction::ConfigChanged) => {
                orchestrator.sync_config(&store);
                orchestrator.sync_display(&store, &mut display);
            }
            Ok(action) => orchestrator.apply_action(action),
            Err(_) => log_warn!("Serial poll failed"),
        }

        if let Some(bits) = poll_settled() {
            orchestrator.apply_inputs(bits, &store);
        }

        if let Some((device, state)) = display.poll_input() {
            orchestrator.apply_ui(device, state);
        }

        for command in orchestrator.resolve(&store, now) {
            match actuator.drive_value(command.channel, command.value) {
                Ok(()) => display.set_device_visual_state(command.device, command.new_state),
                Err(_) => log_error!("Drive failed on channel {}", command.channel),
            }
        }

        for command in orchestrator.pending_releases(&store, now) {
            if actuator.drive_value(command.channel, command.value).is_err() {
                log_warn!("Release failed on channel {}", command.channel);
            }
        }

        ticker.next().await;
    }
}
