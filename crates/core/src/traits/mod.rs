//! Core traits for platform-agnostic shutter controller functionality.
//!
//! This module provides trait abstractions that decouple core logic
//! from platform-specific implementations (Embassy, Flash drivers, etc.).
//!
//! # Design
//!
//! - Trait definitions are pure and have no feature gates
//! - Mock implementations are always available for host testing
//! - Platform implementations (Embassy, RP2040 Flash) live in the firmware crate

pub mod storage;
pub mod time;

pub use storage::{MockNvStorage, NvError, NvStorage};
pub use time::{MockTime, TimeSource};
