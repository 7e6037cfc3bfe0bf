#![cfg_attr(not(test), no_std)]

//! pico_shutter_firmware - Embassy firmware for the pico_shutter controller
//!
//! This crate provides Embassy async wrappers and RP2040-specific
//! implementations for the core business logic.
//!
//! # Design Principles
//!
//! - **Embassy tasks**: Async tasks for input debouncing and the main loop
//! - **Platform implementations**: TimeSource, storage, and HAL bindings
//! - **Device drivers**: I2C drivers for the actuator boards

// Platform abstraction layer, all hardware-specific code lives below here
pub mod platform;

// Device drivers using the platform I2C abstraction
pub mod devices;

// Shutter actuator implementations on top of the device drivers
pub mod actuators;

// Serial command channel
pub mod comm;

// Non-volatile configuration storage on top of the flash abstraction
pub mod storage;

// Note: Logging macros (log_info!, log_warn!, log_error!, log_debug!)
// are exported at crate root via #[macro_export] in logging
pub mod logging;
