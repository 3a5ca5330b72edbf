//! Robot Routines
//!
//! Compositions of mechanism commands that the drivers trigger by name.
//! External triggers (buttons, autonomous steps) post a [`Routine`] request;
//! the control loop takes it at the start of its next tick and schedules the
//! matching command tree.

use alloc::boxed::Box;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;

use crate::system::command::{Command, CommandExt, Race, Wait};
use crate::system::config::RobotConfig;
use crate::system::indicator;
use crate::system::intake;
use crate::system::robot::Robot;
use crate::system::shooter;

/// Pending routine request; a newer request replaces an unclaimed one
static ROUTINE_REQUEST: Signal<CriticalSectionRawMutex, Routine> = Signal::new();

/// Named behaviors that can be requested from outside the control loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Routine {
    /// Intake until captured
    Intake,
    /// Intake while blinking the indicator, until captured
    IntakeAndBlink,
    /// Reverse the intake until cancelled
    Eject,
    /// Push the held object into the shooter
    LoadToShooter,
    /// Spin up, then feed the object through the flywheel
    Shoot,
    /// Cancel everything and stop all mechanisms
    Stop,
}

impl Routine {
    /// Builds the command tree for this routine
    ///
    /// `Stop` has no tree; the control loop handles it by cancelling.
    pub fn build(self, config: &RobotConfig) -> Option<Box<dyn Command<Robot>>> {
        let command = match self {
            Routine::Intake => intake::run_default(config).boxed(),
            Routine::IntakeAndBlink => intake_and_blink(config).boxed(),
            Routine::Eject => eject(config).boxed(),
            Routine::LoadToShooter => load_to_shooter(config).boxed(),
            Routine::Shoot => shoot(config).boxed(),
            Routine::Stop => return None,
        };
        Some(command)
    }
}

/// Posts a routine request for the control loop
pub fn request(routine: Routine) {
    ROUTINE_REQUEST.signal(routine);
}

/// Takes the pending request, if any
pub fn try_take() -> Option<Routine> {
    ROUTINE_REQUEST.try_take()
}

/// Intake raced with a blinking indicator; a capture ends both
pub fn intake_and_blink(config: &RobotConfig) -> Race<Robot> {
    intake::run_default(config).race_with(indicator::blink_red(config))
}

pub fn load_to_shooter(config: &RobotConfig) -> Race<Robot> {
    intake::load_to_shooter(config)
}

/// Spins the flywheel while it waits for spin-up and then pushes the object in
///
/// The flywheel stops as soon as the push is done.
pub fn shoot(config: &RobotConfig) -> Race<Robot> {
    let feed = Wait::new(config.shooter.spin_up).and_then(intake::load_to_shooter(config));
    shooter::run(config.shooter.run_speed).race_with(feed)
}

pub fn eject(config: &RobotConfig) -> impl Command<Robot> {
    intake::eject(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::command::{EndReason, Requirements, Unit, UnitState};
    use crate::system::indicator::LedColor;
    use crate::system::robot::testing::{bench_robot, CAPTURED, EMPTY};

    #[test]
    fn test_intake_and_blink_ends_together() {
        let mut bench = bench_robot();
        let mut unit = Unit::new(intake_and_blink(&RobotConfig::DEFAULT));

        for _ in 0..3 {
            bench.tick(EMPTY);
            assert_eq!(unit.tick(&mut bench.robot), UnitState::Running);
        }
        assert_eq!(bench.arm.speed(), 0.6);
        assert_eq!(bench.ground.speed(), 0.8);
        assert_eq!(bench.led.color(), LedColor::Red);

        bench.tick(CAPTURED);
        assert_eq!(
            unit.tick(&mut bench.robot),
            UnitState::Ended(EndReason::Completed)
        );
        assert!(bench.arm.is_stopped());
        assert!(bench.ground.is_stopped());
        assert_eq!(bench.led.color(), LedColor::Off);
    }

    #[test]
    fn test_shoot_spins_up_before_feeding() {
        let config = RobotConfig::DEFAULT;
        let mut bench = bench_robot();
        let mut unit = Unit::new(shoot(&config));

        bench.tick(CAPTURED);
        unit.tick(&mut bench.robot);
        assert_eq!(bench.shooter.speed(), 1.0);
        assert_eq!(bench.arm.set_calls(), 0);

        // Spin-up elapses; the push starts on the following tick
        bench.advance(config.shooter.spin_up, CAPTURED);
        unit.tick(&mut bench.robot);
        bench.tick(CAPTURED);
        unit.tick(&mut bench.robot);
        assert_eq!(bench.arm.speed(), 1.0);
        assert!(bench.robot.intake.is_forced());

        // Object leaves the intake: push done, flywheel stopped in the same tick
        bench.tick(EMPTY);
        assert_eq!(
            unit.tick(&mut bench.robot),
            UnitState::Ended(EndReason::Completed)
        );
        assert!(bench.arm.is_stopped());
        assert!(bench.shooter.is_stopped());
    }

    #[test]
    fn test_load_to_shooter_routine_pushes_object_out() {
        let config = RobotConfig::DEFAULT;
        let mut bench = bench_robot();
        let mut unit = Unit::from_boxed(Routine::LoadToShooter.build(&config).unwrap());
        assert!(unit.requirements().contains(Requirements::INTAKE));

        bench.tick(CAPTURED);
        assert_eq!(unit.tick(&mut bench.robot), UnitState::Running);
        assert_eq!(bench.arm.speed(), config.intake.push_to_shooter);
        assert!(bench.robot.intake.is_forced());

        bench.tick(EMPTY);
        assert_eq!(
            unit.tick(&mut bench.robot),
            UnitState::Ended(EndReason::Completed)
        );
        assert!(bench.arm.is_stopped());
        assert!(bench.ground.is_stopped());
    }

    #[test]
    fn test_request_keeps_latest() {
        request(Routine::Intake);
        request(Routine::Shoot);
        assert_eq!(try_take(), Some(Routine::Shoot));
        assert_eq!(try_take(), None);
        assert!(Routine::Stop.build(&RobotConfig::DEFAULT).is_none());
        assert!(Routine::Eject.build(&RobotConfig::DEFAULT).is_some());
    }
}
