//! Shooter flywheel
//!
//! One motor spun at a normalized speed. The driver receives the normalized
//! value; the equivalent voltage is published with the telemetry snapshot.

use alloc::boxed::Box;

use crate::system::actuator::{clamp_speed, MotorController};
use crate::system::command::{Command, Requirements, RunEnd, RunOnce};
use crate::system::config::ShooterConfig;
use crate::system::robot::Robot;

pub struct Shooter {
    motor: Box<dyn MotorController>,
    nominal_voltage: f32,
    speed: f32,
}

impl Shooter {
    pub fn new(mut motor: Box<dyn MotorController>, config: &ShooterConfig) -> Self {
        motor.stop_motor();
        Self {
            motor,
            nominal_voltage: config.nominal_voltage,
            speed: 0.0,
        }
    }

    pub fn set_shooter_speed(&mut self, speed: f32) {
        let speed = clamp_speed(speed);
        if speed != self.speed {
            self.motor.set(speed);
            self.speed = speed;
        }
    }

    pub fn stop(&mut self) {
        self.motor.stop_motor();
        self.speed = 0.0;
    }

    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// Voltage equivalent of the commanded speed
    pub fn voltage(&self) -> f32 {
        self.speed * self.nominal_voltage
    }
}

/// Spins the flywheel until interrupted, stopping it on exit
pub fn run(speed: f32) -> impl Command<Robot> {
    RunEnd::new(
        "shooter run",
        Requirements::SHOOTER,
        move |robot: &mut Robot| robot.shooter.set_shooter_speed(speed),
        |robot: &mut Robot| robot.shooter.stop(),
    )
}

pub fn stop() -> impl Command<Robot> {
    RunOnce::new("shooter stop", Requirements::SHOOTER, |robot: &mut Robot| {
        robot.shooter.stop()
    })
}
