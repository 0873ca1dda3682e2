//! Testing utilities and mock implementations
//!
//! Mock publisher and decoder for exercising the pipeline without an MQTT
//! broker or real PDUs.

pub mod mocks;

pub use mocks::*;
