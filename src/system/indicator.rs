//! Status Indicator
//!
//! A red/green LED that tells the drivers what the intake is doing: blinking
//! red while it is waiting for an object, solid green once it holds one.

use alloc::boxed::Box;
use embassy_time::{Duration, Instant};

use crate::system::command::{Clock, Command, EndReason, Requirements, Run};
use crate::system::config::RobotConfig;
use crate::system::robot::Robot;

/// Colors the indicator can show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedColor {
    #[default]
    Off,
    Red,
    Green,
}

/// LED driver
pub trait IndicatorLed {
    fn set_color(&mut self, color: LedColor);
}

/// Indicator mechanism
pub struct Indicator {
    led: Box<dyn IndicatorLed>,
    color: LedColor,
}

impl Indicator {
    pub fn new(mut led: Box<dyn IndicatorLed>) -> Self {
        led.set_color(LedColor::Off);
        Self {
            led,
            color: LedColor::Off,
        }
    }

    /// Shows `color`, skipping the write when it is already shown
    pub fn set(&mut self, color: LedColor) {
        if self.color != color {
            self.led.set_color(color);
            self.color = color;
        }
    }

    pub fn off(&mut self) {
        self.set(LedColor::Off);
    }

    pub fn color(&self) -> LedColor {
        self.color
    }
}

/// Blinks a color until the intake holds an object
pub struct Blink {
    color: LedColor,
    interval: Duration,
    last_toggle: Option<Instant>,
    lit: bool,
}

impl Blink {
    pub fn new(color: LedColor, interval: Duration) -> Self {
        Self {
            color,
            interval,
            last_toggle: None,
            lit: false,
        }
    }

    fn show(&self, robot: &mut Robot) {
        let color = if self.lit { self.color } else { LedColor::Off };
        robot.indicator.set(color);
    }
}

impl Command<Robot> for Blink {
    fn name(&self) -> &'static str {
        "blink"
    }

    fn requirements(&self) -> Requirements {
        Requirements::INDICATOR
    }

    fn initialize(&mut self, robot: &mut Robot) {
        self.lit = true;
        self.last_toggle = Some(robot.now());
        self.show(robot);
    }

    fn execute(&mut self, robot: &mut Robot) {
        let now = robot.now();
        let due = self
            .last_toggle
            .map_or(true, |last| now.saturating_duration_since(last) >= self.interval);
        if due {
            self.lit = !self.lit;
            self.last_toggle = Some(now);
            self.show(robot);
        }
    }

    fn is_finished(&mut self, robot: &Robot) -> bool {
        robot.intake.has_object()
    }

    fn end(&mut self, robot: &mut Robot, _reason: EndReason) {
        robot.indicator.off();
    }
}

/// Blinks red until an object is captured
pub fn blink_red(config: &RobotConfig) -> Blink {
    Blink::new(LedColor::Red, config.timing.blink_interval)
}

/// Green while an object is held, red otherwise
pub fn idle() -> impl Command<Robot> {
    Run::new("indicator idle", Requirements::INDICATOR, |robot: &mut Robot| {
        let color = if robot.intake.has_object() {
            LedColor::Green
        } else {
            LedColor::Red
        };
        robot.indicator.set(color);
    })
}
