//! pico_shutter_core - Pure no_std business logic for the pico_shutter controller
//!
//! This crate contains platform-agnostic algorithms and types
//! that can be tested on host without any feature flags or embassy dependencies.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives allowed
//! - **Pure no_std**: No std library dependencies
//! - **Trait abstractions**: Platform services injected via traits
//!
//! # Modules
//!
//! - [`traits`]: Platform-agnostic trait abstractions (TimeSource, NvStorage)
//! - [`config`]: Shutter configuration store and non-volatile record format
//! - [`debounce`]: Debounce engine state machine for digital inputs
//! - [`protocol`]: Serial line protocol parser and dispatcher
//! - [`actuator`]: Shutter drive trait and logical state types
//! - [`display`]: Display collaborator interface (implemented externally)
//! - [`orchestrator`]: Per-cycle request resolution and state ownership

#![no_std]

pub mod actuator;
pub mod config;
pub mod debounce;
pub mod display;
pub mod orchestrator;
pub mod protocol;
pub mod traits;
