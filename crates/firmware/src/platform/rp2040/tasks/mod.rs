//! RP2040 Platform Embassy Tasks
//!
//! Embassy async tasks that are platform-specific and require the `pico`
//! feature.
//!
//! ## Available Tasks
//!
//! - `debounce_task` - edge-triggered digital input sampling

pub mod debounce;

pub use debounce::{debounce_task, poll_settled};
