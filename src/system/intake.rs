//! Intake Control
//!
//! The intake pulls an object in with two rollers (arm and ground) and must
//! stop on its own the moment the color sensor sees the object, so it never
//! jams the object into the shooter by accident.
//!
//! # Gating
//! Every speed request carries a `force` flag. For each roller separately:
//! - A strictly positive (intake direction) request is dropped to 0 when an
//!   object is detected and the request is not forced
//! - Everything else passes through unchanged: reversing to clear a jam is
//!   never blocked, and forced requests ignore the sensor entirely
//!
//! The last `force` value is kept so callers can see which mode is active.
//!
//! # Sensor failures
//! A failed read clears the sample, which reads as "no object". Running the
//! rollers on a bad sensor beats locking the mechanism for the whole match.

use crate::system::actuator::{Actuator, ActuatorCommand, ActuatorPair};
use crate::system::command::{Command, CommandExt, Race, Requirements, RunEnd, RunOnce, WaitUntil};
use crate::system::config::RobotConfig;
use crate::system::detector::ObjectDetector;
use crate::system::error::SensorError;
use crate::system::robot::Robot;
use crate::system::sensor::RawSensorSample;

/// Requested speeds plus the force flag of the latest request
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntakeState {
    pub requested_primary: f32,
    pub requested_secondary: f32,
    pub forced: bool,
}

/// Applies the gating rule to one roller
pub fn gate(requested: f32, detected: bool, force: bool) -> f32 {
    if requested > 0.0 && detected && !force {
        0.0
    } else {
        requested
    }
}

/// Sensor-gated intake
pub struct IntakeController {
    actuators: ActuatorPair,
    detector: ObjectDetector,
    sample: Option<RawSensorSample>,
    state: IntakeState,
}

impl IntakeController {
    pub fn new(actuators: ActuatorPair, detector: ObjectDetector) -> Self {
        Self {
            actuators,
            detector,
            sample: None,
            state: IntakeState::default(),
        }
    }

    /// Stores this tick's sensor reading
    ///
    /// Must run before any command of the tick so the verdict and the speed
    /// decision see the same sample.
    pub fn update_sample(&mut self, reading: Result<RawSensorSample, SensorError>) {
        self.sample = match reading {
            Ok(sample) => Some(sample),
            Err(SensorError::Unavailable) => None,
            Err(e) => {
                log_warn!("Color sensor read failed: {:?}", e);
                None
            }
        };
    }

    /// Latest sample, if the last read succeeded
    pub fn sample(&self) -> Option<RawSensorSample> {
        self.sample
    }

    /// Live detection verdict for the latest sample
    pub fn has_object(&self) -> bool {
        self.sample
            .as_ref()
            .is_some_and(|sample| self.detector.detect(sample))
    }

    /// Requests roller speeds, gated by the detector unless `force` is set
    ///
    /// Returns the speeds actually applied.
    pub fn set_intake_speed(&mut self, primary: f32, secondary: f32, force: bool) -> ActuatorCommand {
        self.state = IntakeState {
            requested_primary: primary,
            requested_secondary: secondary,
            forced: force,
        };

        let detected = self.has_object();
        let command = ActuatorCommand {
            primary: gate(primary, detected, force),
            secondary: gate(secondary, detected, force),
        };
        if detected && !force && command != (ActuatorCommand { primary, secondary }) {
            log_debug!("Intake gated: object held");
        }

        self.actuators.set_speeds(command.primary, command.secondary);
        self.actuators.command()
    }

    /// Same speed on both rollers, unforced
    pub fn set_speed(&mut self, speed: f32) -> ActuatorCommand {
        self.set_intake_speed(speed, speed, false)
    }

    /// Stops both rollers; the force flag is left as it was
    pub fn stop(&mut self) {
        self.actuators.stop();
    }

    pub fn is_forced(&self) -> bool {
        self.state.forced
    }

    pub fn state(&self) -> IntakeState {
        self.state
    }

    pub fn arm_speed(&self) -> f32 {
        self.actuators.speed(Actuator::Primary)
    }

    pub fn ground_speed(&self) -> f32 {
        self.actuators.speed(Actuator::Secondary)
    }

    /// Speeds currently applied to the rollers
    pub fn command(&self) -> ActuatorCommand {
        self.actuators.command()
    }

    pub fn is_stopped(&self) -> bool {
        self.actuators.is_stopped()
    }
}

/// Drives the rollers every tick and stops them on exit; never finishes alone
pub fn drive(primary: f32, secondary: f32, force: bool) -> impl Command<Robot> {
    RunEnd::new(
        "intake drive",
        Requirements::INTAKE,
        move |robot: &mut Robot| {
            robot.intake.set_intake_speed(primary, secondary, force);
        },
        |robot: &mut Robot| robot.intake.stop(),
    )
}

/// Runs both rollers at their own speeds until an object is captured
pub fn run_pair(arm: f32, ground: f32) -> impl Command<Robot> {
    drive(arm, ground, false).until(|robot: &Robot| robot.intake.has_object())
}

/// Runs both rollers at `speed` until an object is captured
pub fn run(speed: f32) -> impl Command<Robot> {
    run_pair(speed, speed)
}

/// Runs at the configured intake speeds until an object is captured
pub fn run_default(config: &RobotConfig) -> impl Command<Robot> {
    run_pair(config.intake.arm_run, config.intake.ground_run)
}

pub fn stop() -> impl Command<Robot> {
    RunOnce::new("intake stop", Requirements::INTAKE, |robot: &mut Robot| {
        robot.intake.stop()
    })
}

/// Reverses both rollers until interrupted
pub fn eject(config: &RobotConfig) -> impl Command<Robot> {
    let speed = config.intake.eject;
    drive(speed, speed, false)
}

/// Drives both rollers past the sensor until interrupted
pub fn force_push(speed: f32) -> impl Command<Robot> {
    drive(speed, speed, true)
}

/// Pushes the held object into the shooter
///
/// Forced arm drive raced against a bound that ends when the object is gone
/// or the push timeout runs out. Running out of time counts as done.
pub fn load_to_shooter(config: &RobotConfig) -> Race<Robot> {
    let bound = WaitUntil::new(|robot: &Robot| !robot.intake.has_object())
        .with_timeout(config.timing.push_timeout);
    drive(config.intake.push_to_shooter, 0.0, true).race_with(bound)
}
