//! Test doubles for mechanism drivers
//!
//! Each double is a cheap handle over shared state: hand one clone to the
//! mechanism and keep another to inspect what the mechanism did.

use alloc::rc::Rc;
use core::cell::{Cell, RefCell};

use crate::system::actuator::MotorController;
use crate::system::indicator::{IndicatorLed, LedColor};

#[derive(Debug, Default)]
struct MotorRecord {
    speed: f32,
    stopped: bool,
    set_calls: usize,
    stop_calls: usize,
}

/// Motor that records every driver call
#[derive(Debug, Clone, Default)]
pub struct MockMotor {
    record: Rc<RefCell<MotorRecord>>,
}

impl MockMotor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Speed the driver currently outputs
    pub fn speed(&self) -> f32 {
        self.record.borrow().speed
    }

    /// True when the last driver call was a stop
    pub fn is_stopped(&self) -> bool {
        self.record.borrow().stopped
    }

    pub fn set_calls(&self) -> usize {
        self.record.borrow().set_calls
    }

    pub fn stop_calls(&self) -> usize {
        self.record.borrow().stop_calls
    }
}

impl MotorController for MockMotor {
    fn set(&mut self, speed: f32) {
        let mut record = self.record.borrow_mut();
        record.speed = speed;
        record.stopped = false;
        record.set_calls += 1;
    }

    fn stop_motor(&mut self) {
        let mut record = self.record.borrow_mut();
        record.speed = 0.0;
        record.stopped = true;
        record.stop_calls += 1;
    }
}

/// Indicator LED that remembers its color and counts changes
#[derive(Debug, Clone, Default)]
pub struct MockLed {
    color: Rc<Cell<LedColor>>,
    changes: Rc<Cell<usize>>,
}

impl MockLed {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn color(&self) -> LedColor {
        self.color.get()
    }

    /// Number of color writes seen by the LED
    pub fn changes(&self) -> usize {
        self.changes.get()
    }
}

impl IndicatorLed for MockLed {
    fn set_color(&mut self, color: LedColor) {
        self.color.set(color);
        self.changes.set(self.changes.get() + 1);
    }
}
