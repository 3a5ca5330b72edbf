//! Closure-backed commands and waits

use embassy_time::{Duration, Instant};

use super::{Clock, Command, EndReason, Requirements};

/// Runs `action` every tick, forever
pub struct Run<F> {
    name: &'static str,
    requirements: Requirements,
    action: F,
}

impl<F> Run<F> {
    pub fn new(name: &'static str, requirements: Requirements, action: F) -> Self {
        Self {
            name,
            requirements,
            action,
        }
    }
}

impl<R, F: FnMut(&mut R)> Command<R> for Run<F> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn requirements(&self) -> Requirements {
        self.requirements
    }

    fn execute(&mut self, robot: &mut R) {
        (self.action)(robot)
    }
}

/// Runs `action` every tick and `cleanup` when it ends, whatever the reason
pub struct RunEnd<F, G> {
    name: &'static str,
    requirements: Requirements,
    action: F,
    cleanup: G,
}

impl<F, G> RunEnd<F, G> {
    pub fn new(name: &'static str, requirements: Requirements, action: F, cleanup: G) -> Self {
        Self {
            name,
            requirements,
            action,
            cleanup,
        }
    }
}

impl<R, F, G> Command<R> for RunEnd<F, G>
where
    F: FnMut(&mut R),
    G: FnMut(&mut R),
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn requirements(&self) -> Requirements {
        self.requirements
    }

    fn execute(&mut self, robot: &mut R) {
        (self.action)(robot)
    }

    fn end(&mut self, robot: &mut R, _reason: EndReason) {
        (self.cleanup)(robot)
    }
}

/// Runs `action` once and finishes in the same tick
pub struct RunOnce<F> {
    name: &'static str,
    requirements: Requirements,
    action: F,
}

impl<F> RunOnce<F> {
    pub fn new(name: &'static str, requirements: Requirements, action: F) -> Self {
        Self {
            name,
            requirements,
            action,
        }
    }
}

impl<R, F: FnMut(&mut R)> Command<R> for RunOnce<F> {
    fn name(&self) -> &'static str {
        self.name
    }

    fn requirements(&self) -> Requirements {
        self.requirements
    }

    fn execute(&mut self, robot: &mut R) {
        (self.action)(robot)
    }

    fn is_finished(&mut self, _robot: &R) -> bool {
        true
    }
}

/// Does nothing until `predicate` holds
pub struct WaitUntil<P> {
    predicate: P,
}

impl<P> WaitUntil<P> {
    pub fn new(predicate: P) -> Self {
        Self { predicate }
    }
}

impl<R, P: FnMut(&R) -> bool> Command<R> for WaitUntil<P> {
    fn name(&self) -> &'static str {
        "wait until"
    }

    fn execute(&mut self, _robot: &mut R) {}

    fn is_finished(&mut self, robot: &R) -> bool {
        (self.predicate)(robot)
    }
}

/// Does nothing for a fixed time, measured with the robot clock
pub struct Wait {
    duration: Duration,
    started: Option<Instant>,
}

impl Wait {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            started: None,
        }
    }
}

impl<R: Clock> Command<R> for Wait {
    fn name(&self) -> &'static str {
        "wait"
    }

    fn initialize(&mut self, robot: &mut R) {
        self.started = Some(robot.now());
    }

    fn execute(&mut self, _robot: &mut R) {}

    fn is_finished(&mut self, robot: &R) -> bool {
        self.started
            .is_some_and(|started| robot.now().saturating_duration_since(started) >= self.duration)
    }
}
