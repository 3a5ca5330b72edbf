//! Intake telemetry
//!
//! A snapshot is published once per control tick. Publishing overwrites the
//! previous snapshot; the core never reads it back.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::system::actuator::ActuatorCommand;
use crate::system::indicator::LedColor;
use crate::system::intake::IntakeState;
use crate::system::sensor::RawSensorSample;

/// Latest published snapshot
static TELEMETRY: Signal<CriticalSectionRawMutex, IntakeTelemetry> = Signal::new();

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntakeTelemetry {
    /// `None` when the last sensor read failed
    pub sample: Option<RawSensorSample>,
    pub object_detected: bool,
    pub requested: IntakeState,
    pub applied: ActuatorCommand,
    pub shooter_speed: f32,
    /// Flywheel speed times the nominal supply voltage
    pub shooter_voltage: f32,
    pub indicator: LedColor,
}

/// Replaces the pending snapshot
pub fn publish(snapshot: IntakeTelemetry) {
    TELEMETRY.signal(snapshot);
}

/// Waits for the next snapshot
pub async fn wait() -> IntakeTelemetry {
    TELEMETRY.wait().await
}

/// Takes the pending snapshot, if any
pub fn try_take() -> Option<IntakeTelemetry> {
    TELEMETRY.try_take()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_snapshot_wins() {
        let first = IntakeTelemetry {
            sample: None,
            object_detected: false,
            requested: IntakeState::default(),
            applied: ActuatorCommand::default(),
            shooter_speed: 0.0,
            shooter_voltage: 0.0,
            indicator: LedColor::Off,
        };
        let second = IntakeTelemetry {
            object_detected: true,
            ..first
        };

        publish(first);
        publish(second);
        assert_eq!(try_take(), Some(second));
        assert_eq!(try_take(), None);
    }
}
