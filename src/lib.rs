//! Intake control core
//!
//! Sensor-gated actuator control and cancellable command composition for the
//! robot's intake, shooter and indicator mechanisms. Everything in here is
//! platform independent; the firmware binary supplies the drivers and the
//! fixed-rate loop.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

#[macro_use]
pub mod logging;

/// Mechanisms, commands and the periodic runner
pub mod system;

pub use system::error::{CommandError, SensorError};
