//! Shutter drive abstraction and logical state types.
//!
//! The orchestrator turns a logical open/close/position request into a
//! [`ShutterDrive::drive_value`] call; what the value means is up to the
//! drive variant:
//!
//! - **RC servo**: a PWM pulse-width tick count, passed through unmodified
//! - **Solenoid**: a drive force 0-255, where 0 releases the actuator
//!
//! Both hardware implementations live in the firmware crate; this module
//! only fixes the contract between them and the orchestrator.

/// Logical state of one shutter, as believed by the orchestrator.
///
/// Independent of the actual physical position; there is no feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShutterState {
    /// Shutter driven to its closed end state
    Closed,
    /// Shutter driven to its open end state
    Open,
    /// No transition resolved yet, or a manual raw value was driven
    #[default]
    Undefined,
}

impl ShutterState {
    /// Wire encoding used by the serial protocol (`GST` response, `SST` argument).
    pub fn as_wire(self) -> i8 {
        match self {
            ShutterState::Closed => 0,
            ShutterState::Open => 1,
            ShutterState::Undefined => -1,
        }
    }

    /// Decode the protocol wire value; only 0 and 1 are accepted.
    pub fn from_wire(value: i8) -> Option<Self> {
        match value {
            0 => Some(ShutterState::Closed),
            1 => Some(ShutterState::Open),
            _ => None,
        }
    }
}

impl core::fmt::Display for ShutterState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.as_wire())
    }
}

/// Errors from actuator drive operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveError {
    /// Actuator board did not respond during initialization.
    ///
    /// Callers treat this as fatal; the controller must not run without a
    /// verified board.
    BoardNotFound,
    /// Bus transfer to the actuator board failed
    Bus,
}

impl core::fmt::Display for DriveError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            DriveError::BoardNotFound => write!(f, "actuator board not found"),
            DriveError::Bus => write!(f, "actuator bus transfer failed"),
        }
    }
}

/// Uniform interface over the shutter drive variants.
///
/// Implementations are stateless beyond one-time initialization; the
/// orchestrator is responsible for sequencing (idle disengage for servos,
/// scheduling a release for solenoids without position feedback).
pub trait ShutterDrive {
    /// One-time hardware setup (bus/frequency configuration).
    ///
    /// The solenoid variant also forces all outputs to the released
    /// condition here.
    ///
    /// # Errors
    ///
    /// Returns [`DriveError::BoardNotFound`] if the actuator board does not
    /// respond. Callers must treat this as fatal.
    fn init(&mut self) -> Result<(), DriveError>;

    /// Drive output `channel` to `value`.
    ///
    /// Servo drives pass `value` through to the PWM output unmodified; the
    /// configured positions carry the calibration. Solenoid drives clamp to
    /// 0-255 and ignore channels beyond the wired motor count.
    fn drive_value(&mut self, channel: u8, value: u16) -> Result<(), DriveError>;
}
