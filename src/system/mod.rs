//! Core system components for intake operation
pub mod actuator;
pub mod color_sensor;
pub mod command;
pub mod config;
pub mod detector;
pub mod error;
pub mod indicator;
pub mod intake;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod pose;
pub mod robot;
pub mod routines;
pub mod scheduler;
pub mod sensor;
pub mod shooter;
pub mod telemetry;
