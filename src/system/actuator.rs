//! Actuator Pair
//!
//! Two independently speed-controlled motors driven as one mechanism. The
//! pair remembers what it last commanded and only touches a driver when the
//! command actually changes, so repeating a call has no physical effect.
//!
//! # Stopping
//! `stop()` goes through the driver's dedicated stop path (brake or coast as
//! configured for that motor). It is not the same as commanding speed 0.

use alloc::boxed::Box;

/// Speed-controlled motor as seen by a mechanism
pub trait MotorController {
    /// Apply a normalized speed in [-1, 1]
    fn set(&mut self, speed: f32);

    /// Stop the motor using its idle behavior
    fn stop_motor(&mut self);
}

/// Motor selection within a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Actuator {
    /// Arm roller
    Primary,
    /// Ground roller
    Secondary,
}

/// Speeds written to a pair during one tick
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorCommand {
    pub primary: f32,
    pub secondary: f32,
}

/// Last state written to one driver
#[derive(Debug, Clone, Copy, PartialEq)]
enum Output {
    Running(f32),
    Stopped,
}

impl Output {
    fn speed(self) -> f32 {
        match self {
            Output::Running(speed) => speed,
            Output::Stopped => 0.0,
        }
    }
}

/// Clamp to [-1, 1], mapping NaN to 0
pub fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        0.0
    } else {
        speed.clamp(-1.0, 1.0)
    }
}

struct MotorChannel {
    driver: Box<dyn MotorController>,
    output: Output,
}

impl MotorChannel {
    fn new(driver: Box<dyn MotorController>) -> Self {
        Self {
            driver,
            output: Output::Stopped,
        }
    }

    fn set(&mut self, speed: f32) {
        let speed = clamp_speed(speed);
        if self.output == Output::Running(speed) {
            return;
        }
        self.driver.set(speed);
        self.output = Output::Running(speed);
    }

    fn stop(&mut self) {
        if self.output == Output::Stopped {
            return;
        }
        self.driver.stop_motor();
        self.output = Output::Stopped;
    }
}

/// Primary and secondary motor of one mechanism
pub struct ActuatorPair {
    primary: MotorChannel,
    secondary: MotorChannel,
}

impl ActuatorPair {
    /// Creates a pair; both drivers are assumed to start stopped
    pub fn new(primary: Box<dyn MotorController>, secondary: Box<dyn MotorController>) -> Self {
        Self {
            primary: MotorChannel::new(primary),
            secondary: MotorChannel::new(secondary),
        }
    }

    /// Clamps both speeds and applies them
    pub fn set_speeds(&mut self, primary: f32, secondary: f32) {
        self.primary.set(primary);
        self.secondary.set(secondary);
    }

    /// Stops both motors through the drivers' stop path
    pub fn stop(&mut self) {
        self.primary.stop();
        self.secondary.stop();
    }

    /// Last commanded speed (0 when stopped)
    pub fn speed(&self, which: Actuator) -> f32 {
        match which {
            Actuator::Primary => self.primary.output.speed(),
            Actuator::Secondary => self.secondary.output.speed(),
        }
    }

    /// Last commanded speeds of both motors
    pub fn command(&self) -> ActuatorCommand {
        ActuatorCommand {
            primary: self.speed(Actuator::Primary),
            secondary: self.speed(Actuator::Secondary),
        }
    }

    /// True when both motors went through the stop path and have not been commanded since
    pub fn is_stopped(&self) -> bool {
        self.primary.output == Output::Stopped && self.secondary.output == Output::Stopped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::mock::MockMotor;

    fn pair() -> (ActuatorPair, MockMotor, MockMotor) {
        let primary = MockMotor::new();
        let secondary = MockMotor::new();
        let pair = ActuatorPair::new(Box::new(primary.clone()), Box::new(secondary.clone()));
        (pair, primary, secondary)
    }

    #[test]
    fn test_speeds_are_clamped() {
        let (mut pair, primary, secondary) = pair();
        pair.set_speeds(1.7, -3.0);
        assert_eq!(pair.speed(Actuator::Primary), 1.0);
        assert_eq!(pair.speed(Actuator::Secondary), -1.0);
        assert_eq!(primary.speed(), 1.0);
        assert_eq!(secondary.speed(), -1.0);

        pair.set_speeds(f32::NAN, 0.25);
        assert_eq!(pair.speed(Actuator::Primary), 0.0);
        assert_eq!(pair.speed(Actuator::Secondary), 0.25);
    }

    #[test]
    fn test_repeated_set_is_idempotent() {
        let (mut pair, primary, _) = pair();
        pair.set_speeds(0.5, 0.5);
        let once = pair.command();
        pair.set_speeds(0.5, 0.5);
        assert_eq!(pair.command(), once);
        assert_eq!(primary.set_calls(), 1);
    }

    #[test]
    fn test_stop_uses_dedicated_path() {
        let (mut pair, primary, secondary) = pair();
        pair.set_speeds(0.4, -0.2);
        pair.stop();
        assert!(pair.is_stopped());
        assert_eq!(pair.command(), ActuatorCommand::default());
        assert_eq!(primary.stop_calls(), 1);
        assert_eq!(secondary.stop_calls(), 1);
        assert!(primary.is_stopped());

        // Second stop changes nothing
        pair.stop();
        assert_eq!(primary.stop_calls(), 1);
    }

    #[test]
    fn test_zero_speed_is_not_a_stop() {
        let (mut pair, primary, _) = pair();
        pair.set_speeds(0.0, 0.0);
        assert!(!pair.is_stopped());
        assert_eq!(primary.set_calls(), 1);
        assert_eq!(primary.stop_calls(), 0);
    }
}
