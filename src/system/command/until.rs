//! Conditional termination
//!
//! Both wrappers turn an unbounded command into a bounded one. The condition
//! is checked after the wrapped command's `execute`, so the action and the
//! check see the same sensor sample.

use embassy_time::{Duration, Instant};

use super::{Clock, Command, EndReason, Requirements};

/// Ends the wrapped command the first tick `predicate` holds
pub struct Until<C, P> {
    inner: C,
    predicate: P,
    met: bool,
}

impl<C, P> Until<C, P> {
    pub fn new(inner: C, predicate: P) -> Self {
        Self {
            inner,
            predicate,
            met: false,
        }
    }
}

impl<R, C, P> Command<R> for Until<C, P>
where
    C: Command<R>,
    P: FnMut(&R) -> bool,
{
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn requirements(&self) -> Requirements {
        self.inner.requirements()
    }

    fn initialize(&mut self, robot: &mut R) {
        self.met = false;
        self.inner.initialize(robot);
    }

    fn execute(&mut self, robot: &mut R) {
        self.inner.execute(robot);
        self.met = (self.predicate)(robot);
    }

    fn is_finished(&mut self, robot: &R) -> bool {
        self.met || self.inner.is_finished(robot)
    }

    fn end(&mut self, robot: &mut R, reason: EndReason) {
        self.inner.end(robot, reason)
    }
}

/// Ends the wrapped command once `limit` has elapsed since its first tick
///
/// Running out of time is a normal completion, not an error.
pub struct Timeout<C> {
    inner: C,
    limit: Duration,
    started: Option<Instant>,
}

impl<C> Timeout<C> {
    pub fn new(inner: C, limit: Duration) -> Self {
        Self {
            inner,
            limit,
            started: None,
        }
    }
}

impl<R: Clock, C: Command<R>> Command<R> for Timeout<C> {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    fn requirements(&self) -> Requirements {
        self.inner.requirements()
    }

    fn initialize(&mut self, robot: &mut R) {
        self.started = Some(robot.now());
        self.inner.initialize(robot);
    }

    fn execute(&mut self, robot: &mut R) {
        self.inner.execute(robot);
    }

    fn is_finished(&mut self, robot: &R) -> bool {
        let expired = self
            .started
            .is_some_and(|started| robot.now().saturating_duration_since(started) >= self.limit);
        expired || self.inner.is_finished(robot)
    }

    fn end(&mut self, robot: &mut R, reason: EndReason) {
        self.inner.end(robot, reason)
    }
}
