//! Error types
//!
//! None of these errors stop the control loop. Sensor errors are logged and
//! the sample treated as "no object"; command errors flag programming mistakes
//! in how units of work are built or driven.

use core::fmt;

/// Color/proximity sensor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Bus transaction failed
    Bus,
    /// Device answered with a part id other than the expected one
    UnexpectedPartId(u8),
    /// Device lost its configuration (power-on reset flag set)
    DeviceReset,
    /// Device is not configured and the next setup attempt is not due yet
    Unavailable,
}

/// Command errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommandError {
    /// A race needs at least one member
    EmptyRace,
    /// End was requested for a unit that already ended
    AlreadyEnded {
        /// Name of the offending unit
        name: &'static str,
    },
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorError::Bus => write!(f, "bus transaction failed"),
            SensorError::UnexpectedPartId(id) => {
                write!(f, "unexpected part id 0x{:02X}", id)
            }
            SensorError::DeviceReset => write!(f, "device reset, configuration lost"),
            SensorError::Unavailable => write!(f, "not configured, waiting to retry"),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandError::EmptyRace => write!(f, "race constructed without members"),
            CommandError::AlreadyEnded { name } => {
                write!(f, "unit '{}' ended twice", name)
            }
        }
    }
}
