//! Robot wired to recording drivers

#![allow(dead_code)]

use embassy_time::{Duration, Instant};
use intake_control::system::actuator::ActuatorPair;
use intake_control::system::config::RobotConfig;
use intake_control::system::detector::ObjectDetector;
use intake_control::system::indicator::Indicator;
use intake_control::system::intake::IntakeController;
use intake_control::system::mock::{MockLed, MockMotor};
use intake_control::system::robot::Robot;
use intake_control::system::sensor::RawSensorSample;
use intake_control::system::shooter::Shooter;

pub const CAPTURED: RawSensorSample = RawSensorSample::new(2000, 900, 100, 500, 0);
pub const EMPTY: RawSensorSample = RawSensorSample::new(150, 250, 300, 240, 30);

pub struct Harness {
    pub robot: Robot,
    pub arm: MockMotor,
    pub ground: MockMotor,
    pub shooter: MockMotor,
    pub led: MockLed,
    now: Instant,
}

impl Harness {
    pub fn new() -> Self {
        let config = RobotConfig::DEFAULT;
        let arm = MockMotor::new();
        let ground = MockMotor::new();
        let shooter = MockMotor::new();
        let led = MockLed::new();

        let intake = IntakeController::new(
            ActuatorPair::new(Box::new(arm.clone()), Box::new(ground.clone())),
            ObjectDetector::new(config.detector),
        );
        let robot = Robot::new(
            config,
            intake,
            Shooter::new(Box::new(shooter.clone()), &config.shooter),
            Indicator::new(Box::new(led.clone())),
        );

        Self {
            robot,
            arm,
            ground,
            shooter,
            led,
            now: Instant::from_millis(0),
        }
    }

    /// Begins the next 20 ms tick with `sample`
    pub fn begin(&mut self, sample: RawSensorSample) {
        self.now += Duration::from_millis(20);
        self.robot.begin_tick(self.now, Ok(sample));
    }

    pub fn arm_and_ground(&self) -> (f32, f32) {
        (self.arm.speed(), self.ground.speed())
    }
}
