//! Robot Assembly
//!
//! Owns every mechanism and is the context passed to each command hook. The
//! control loop starts each tick with [`Robot::begin_tick`], which stamps the
//! time and stores the fresh sensor reading before any command runs.

use embassy_time::Instant;

use crate::system::command::Clock;
use crate::system::config::RobotConfig;
use crate::system::error::SensorError;
use crate::system::indicator::Indicator;
use crate::system::intake::IntakeController;
use crate::system::sensor::RawSensorSample;
use crate::system::shooter::Shooter;
use crate::system::telemetry::IntakeTelemetry;

pub struct Robot {
    pub intake: IntakeController,
    pub shooter: Shooter,
    pub indicator: Indicator,
    config: RobotConfig,
    now: Instant,
}

impl Robot {
    pub fn new(
        config: RobotConfig,
        intake: IntakeController,
        shooter: Shooter,
        indicator: Indicator,
    ) -> Self {
        Self {
            intake,
            shooter,
            indicator,
            config,
            now: Instant::from_ticks(0),
        }
    }

    pub fn config(&self) -> &RobotConfig {
        &self.config
    }

    /// Stamps the tick and stores this tick's sensor reading
    pub fn begin_tick(&mut self, now: Instant, reading: Result<RawSensorSample, SensorError>) {
        self.now = now;
        self.intake.update_sample(reading);
    }

    /// Current state for the dashboard
    pub fn telemetry(&self) -> IntakeTelemetry {
        IntakeTelemetry {
            sample: self.intake.sample(),
            object_detected: self.intake.has_object(),
            requested: self.intake.state(),
            applied: self.intake.command(),
            shooter_speed: self.shooter.speed(),
            shooter_voltage: self.shooter.voltage(),
            indicator: self.indicator.color(),
        }
    }
}

impl Clock for Robot {
    fn now(&self) -> Instant {
        self.now
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Robot wired to mock drivers

    use alloc::boxed::Box;
    use embassy_time::Duration;

    use super::*;
    use crate::system::actuator::ActuatorPair;
    use crate::system::detector::ObjectDetector;
    use crate::system::mock::{MockLed, MockMotor};

    /// Object held against the sensor
    pub const CAPTURED: RawSensorSample = RawSensorSample::new(2000, 900, 100, 500, 0);
    /// Nothing in front of the sensor
    pub const EMPTY: RawSensorSample = RawSensorSample::new(120, 300, 280, 260, 40);

    pub struct RobotBench {
        pub robot: Robot,
        pub arm: MockMotor,
        pub ground: MockMotor,
        pub shooter: MockMotor,
        pub led: MockLed,
        now: Instant,
    }

    impl RobotBench {
        /// Starts the next control tick with `sample`
        pub fn tick(&mut self, sample: RawSensorSample) {
            let period = self.robot.config().timing.tick_period;
            self.advance(period, sample);
        }

        /// Starts a tick `by` after the previous one
        pub fn advance(&mut self, by: Duration, sample: RawSensorSample) {
            self.now += by;
            self.robot.begin_tick(self.now, Ok(sample));
        }
    }

    pub fn bench_robot() -> RobotBench {
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

        RobotBench {
            robot,
            arm,
            ground,
            shooter,
            led,
            now: Instant::from_ticks(0),
        }
    }
}
