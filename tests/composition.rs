mod common;

use common::{Harness, CAPTURED, EMPTY};
use intake_control::system::command::{
    CommandExt, EndReason, Race, Requirements, Run, Unit, UnitState, WaitUntil,
};
use intake_control::system::indicator::LedColor;
use intake_control::system::intake;
use intake_control::system::robot::Robot;
use intake_control::system::routines::{self, Routine};
use intake_control::system::scheduler::Scheduler;
use intake_control::CommandError;

#[test]
fn test_race_ends_both_on_detection() {
    let mut harness = Harness::new();
    let mut race = Unit::new(
        intake::drive(0.5, 0.5, false)
            .race_with(WaitUntil::new(|robot: &Robot| robot.intake.has_object())),
    );

    for _ in 1..5 {
        harness.begin(EMPTY);
        assert_eq!(race.tick(&mut harness.robot), UnitState::Running);
        assert_eq!(harness.arm_and_ground(), (0.5, 0.5));
    }

    harness.begin(CAPTURED);
    assert_eq!(
        race.tick(&mut harness.robot),
        UnitState::Ended(EndReason::Completed)
    );
    assert_eq!(harness.arm_and_ground(), (0.0, 0.0));
    assert!(harness.arm.is_stopped());
    assert!(harness.ground.is_stopped());
}

#[test]
fn test_race_loser_cleanup_fires_in_winning_tick() {
    let mut harness = Harness::new();
    let mut remaining = 3;
    let countdown = Run::new("countdown", Requirements::empty(), |_: &mut Robot| {}).until(
        move |_: &Robot| {
            remaining -= 1;
            remaining == 0
        },
    );
    let mut race = Unit::new(intake::force_push(0.8).race_with(countdown));

    for _ in 0..2 {
        harness.begin(CAPTURED);
        race.tick(&mut harness.robot);
        assert_eq!(harness.arm_and_ground(), (0.8, 0.8));
    }
    harness.begin(CAPTURED);
    assert_eq!(
        race.tick(&mut harness.robot),
        UnitState::Ended(EndReason::Completed)
    );
    assert!(harness.arm.is_stopped());
    assert_eq!(harness.arm.stop_calls(), 1);
}

#[test]
fn test_later_member_still_acts_in_deciding_tick() {
    let mut harness = Harness::new();
    let mut race = Unit::new(
        WaitUntil::new(|robot: &Robot| robot.intake.has_object()).race_with(intake::force_push(0.8)),
    );

    harness.begin(CAPTURED);
    assert_eq!(
        race.tick(&mut harness.robot),
        UnitState::Ended(EndReason::Completed)
    );
    // The push ran its one tick before being raced out and stopped
    assert_eq!(harness.arm.set_calls(), 1);
    assert_eq!(harness.arm.stop_calls(), 1);
    assert!(harness.arm.is_stopped());
    assert!(harness.ground.is_stopped());
}

#[test]
fn test_empty_race_is_rejected() {
    assert_eq!(Race::<Robot>::new(Vec::new()).err(), Some(CommandError::EmptyRace));
}

#[test]
fn test_cascading_interrupt_stops_everything() {
    let mut harness = Harness::new();
    let config = *harness.robot.config();
    let mut scheduler = Scheduler::new();
    let id = scheduler.schedule(&mut harness.robot, routines::intake_and_blink(&config));

    for _ in 0..3 {
        harness.begin(EMPTY);
        scheduler.run(&mut harness.robot);
    }
    assert_eq!(harness.arm_and_ground(), (0.6, 0.8));

    assert!(scheduler.cancel(&mut harness.robot, id));
    assert!(harness.arm.is_stopped());
    assert!(harness.ground.is_stopped());
    assert_eq!(harness.led.color(), LedColor::Off);
    assert_eq!(harness.arm.stop_calls(), 1);
}

#[test]
fn test_new_intake_routine_replaces_old() {
    let mut harness = Harness::new();
    let config = *harness.robot.config();
    let mut scheduler = Scheduler::new();

    let first = Routine::Intake.build(&config).unwrap();
    let first = scheduler.schedule_boxed(&mut harness.robot, first);
    harness.begin(EMPTY);
    scheduler.run(&mut harness.robot);
    assert_eq!(harness.arm_and_ground(), (0.6, 0.8));

    let eject = Routine::Eject.build(&config).unwrap();
    scheduler.schedule_boxed(&mut harness.robot, eject);
    assert!(!scheduler.is_scheduled(first));
    assert!(harness.arm.is_stopped());

    harness.begin(CAPTURED);
    scheduler.run(&mut harness.robot);
    assert_eq!(harness.arm_and_ground(), (-0.5, -0.5));
}

#[test]
fn test_shoot_runs_to_completion() {
    let mut harness = Harness::new();
    let config = *harness.robot.config();
    let mut scheduler = Scheduler::new();
    scheduler.schedule(&mut harness.robot, routines::shoot(&config));

    // Spin-up ends on tick 39, the push starts on tick 40
    for _ in 0..40 {
        harness.begin(CAPTURED);
        scheduler.run(&mut harness.robot);
    }
    assert_eq!(harness.shooter.speed(), 1.0);
    assert_eq!(harness.arm.speed(), 1.0);

    harness.begin(EMPTY);
    scheduler.run(&mut harness.robot);
    assert!(scheduler.is_empty());
    assert!(harness.shooter.is_stopped());
    assert!(harness.arm.is_stopped());
}
