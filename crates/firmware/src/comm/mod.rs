//! Serial command channel

pub mod serial;

pub use serial::SerialComm;
