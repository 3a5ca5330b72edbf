//! Units of Work
//!
//! A command is a cancellable piece of behavior with three hooks: `initialize`
//! when it starts, `execute` once per tick while it runs, and `end` exactly
//! once when it stops. Commands are composed with the combinators in this
//! module ([`Race`], [`Sequence`], [`Until`], [`Timeout`]) and driven by a
//! [`Unit`], which owns the lifecycle and guarantees the single `end` call.
//!
//! # Lifecycle
//! ```text
//! Idle --first tick--> Running --finished / interrupted / raced out--> Ended
//! ```
//! Ending is synchronous: when a unit ends, its cleanup has already run before
//! control returns to the caller.
//!
//! # Context
//! Commands never own the mechanisms they drive. Every hook receives the
//! robot context `R` explicitly, so two commands can act on the same robot
//! without shared ownership.

use alloc::boxed::Box;
use bitflags::bitflags;
use embassy_time::{Duration, Instant};

use crate::system::error::CommandError;

mod functional;
mod group;
mod until;

pub use functional::{Run, RunEnd, RunOnce, Wait, WaitUntil};
pub use group::{Race, Sequence};
pub use until::{Timeout, Until};

bitflags! {
    /// Mechanisms a command drives
    ///
    /// The scheduler interrupts a running command when a new one needs any of
    /// the same mechanisms.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Requirements: u8 {
        const INTAKE = 0b0000_0001;
        const SHOOTER = 0b0000_0010;
        const INDICATOR = 0b0000_0100;
    }
}

/// Why a command ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EndReason {
    /// The command reached its natural end
    Completed,
    /// The command was cancelled from outside
    Interrupted,
    /// A sibling in a race finished first
    RacedOut,
}

impl EndReason {
    /// True for every reason other than natural completion
    pub fn is_interrupted(self) -> bool {
        !matches!(self, EndReason::Completed)
    }
}

/// Lifecycle of a unit of work
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UnitState {
    /// Created but not yet ticked
    Idle,
    /// Ticked at least once and not ended
    Running,
    /// Ended; cleanup has run
    Ended(EndReason),
}

/// Time source for commands with time bounds
pub trait Clock {
    /// Timestamp of the current tick
    fn now(&self) -> Instant;
}

/// A cancellable behavior
pub trait Command<R> {
    /// Name used in log output
    fn name(&self) -> &'static str {
        "command"
    }

    /// Mechanisms this command drives
    fn requirements(&self) -> Requirements {
        Requirements::empty()
    }

    /// Called once, on the first tick
    fn initialize(&mut self, _robot: &mut R) {}

    /// Called once per tick while running
    fn execute(&mut self, robot: &mut R);

    /// Checked after every `execute`
    fn is_finished(&mut self, _robot: &R) -> bool {
        false
    }

    /// Cleanup, called exactly once when the command stops
    fn end(&mut self, _robot: &mut R, _reason: EndReason) {}
}

impl<R, C: Command<R> + ?Sized> Command<R> for Box<C> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn requirements(&self) -> Requirements {
        (**self).requirements()
    }

    fn initialize(&mut self, robot: &mut R) {
        (**self).initialize(robot)
    }

    fn execute(&mut self, robot: &mut R) {
        (**self).execute(robot)
    }

    fn is_finished(&mut self, robot: &R) -> bool {
        (**self).is_finished(robot)
    }

    fn end(&mut self, robot: &mut R, reason: EndReason) {
        (**self).end(robot, reason)
    }
}

/// Owns a command and drives it through its lifecycle
///
/// The `Ended` transition is guarded: a second end request is refused with
/// [`CommandError::AlreadyEnded`] and the command's cleanup is not run again.
pub struct Unit<R> {
    command: Box<dyn Command<R>>,
    state: UnitState,
}

impl<R> Unit<R> {
    pub fn new(command: impl Command<R> + 'static) -> Self {
        Self::from_boxed(Box::new(command))
    }

    pub fn from_boxed(command: Box<dyn Command<R>>) -> Self {
        Self {
            command,
            state: UnitState::Idle,
        }
    }

    pub fn name(&self) -> &'static str {
        self.command.name()
    }

    pub fn requirements(&self) -> Requirements {
        self.command.requirements()
    }

    pub fn state(&self) -> UnitState {
        self.state
    }

    pub fn is_ended(&self) -> bool {
        matches!(self.state, UnitState::Ended(_))
    }

    /// Runs one tick: start on the first call, execute, then end if finished
    ///
    /// Ticking an ended unit does nothing.
    pub fn tick(&mut self, robot: &mut R) -> UnitState {
        match self.state {
            UnitState::Ended(_) => return self.state,
            UnitState::Idle => {
                log_debug!("{} started", self.command.name());
                self.command.initialize(robot);
                self.state = UnitState::Running;
            }
            UnitState::Running => {}
        }

        self.command.execute(robot);
        if self.command.is_finished(robot) {
            self.close(robot, EndReason::Completed);
        }
        self.state
    }

    /// Ends the unit, running its cleanup
    ///
    /// Works from `Idle` as well, so cleanup also covers units that were
    /// cancelled before their first tick.
    pub fn end(&mut self, robot: &mut R, reason: EndReason) -> Result<(), CommandError> {
        if self.is_ended() {
            let name = self.command.name();
            log_error!("{} ended twice", name);
            return Err(CommandError::AlreadyEnded { name });
        }
        self.close(robot, reason);
        Ok(())
    }

    /// Returns an ended unit to `Idle` so its command can run again
    pub(crate) fn rearm(&mut self) {
        if self.is_ended() {
            self.state = UnitState::Idle;
        }
    }

    fn close(&mut self, robot: &mut R, reason: EndReason) {
        self.command.end(robot, reason);
        self.state = UnitState::Ended(reason);
        log_debug!("{} ended: {:?}", self.command.name(), reason);
    }
}

/// Combinator methods available on every command
pub trait CommandExt<R>: Command<R> + Sized + 'static {
    /// Ends the command the first tick `predicate` holds after `execute`
    fn until<P>(self, predicate: P) -> Until<Self, P>
    where
        P: FnMut(&R) -> bool,
    {
        Until::new(self, predicate)
    }

    /// Ends the command once `limit` has elapsed since it started
    fn with_timeout(self, limit: Duration) -> Timeout<Self> {
        Timeout::new(self, limit)
    }

    /// Races this command against `other`; the first to finish ends both
    fn race_with(self, other: impl Command<R> + 'static) -> Race<R> {
        Race::pair(self, other)
    }

    /// Runs `next` after this command completes
    fn and_then(self, next: impl Command<R> + 'static) -> Sequence<R> {
        Sequence::new(alloc::vec![
            Box::new(self) as Box<dyn Command<R>>,
            Box::new(next),
        ])
    }

    fn boxed(self) -> Box<dyn Command<R>> {
        Box::new(self)
    }
}

impl<R, C: Command<R> + 'static> CommandExt<R> for C {}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn test_unit_lifecycle() {
        let mut bench = Bench::default();
        let mut unit = Unit::new(Tracer::finishing_after("tracer", 2));
        assert_eq!(unit.state(), UnitState::Idle);

        assert_eq!(unit.tick(&mut bench), UnitState::Running);
        assert_eq!(
            unit.tick(&mut bench),
            UnitState::Ended(EndReason::Completed)
        );
        assert_eq!(count(&bench, "tracer", "start"), 1);
        assert_eq!(count(&bench, "tracer", "tick"), 2);
        assert_eq!(count(&bench, "tracer", "completed"), 1);

        // Ticking an ended unit is a no-op
        unit.tick(&mut bench);
        assert_eq!(count(&bench, "tracer", "tick"), 2);
    }

    #[test]
    fn test_double_end_is_refused() {
        let mut bench = Bench::default();
        let mut unit = Unit::new(Tracer::forever("tracer"));
        unit.tick(&mut bench);

        assert_eq!(unit.end(&mut bench, EndReason::Interrupted), Ok(()));
        assert_eq!(
            unit.end(&mut bench, EndReason::Interrupted),
            Err(CommandError::AlreadyEnded { name: "tracer" })
        );
        assert_eq!(count(&bench, "tracer", "interrupted"), 1);
        assert_eq!(unit.state(), UnitState::Ended(EndReason::Interrupted));
    }

    #[test]
    fn test_end_before_first_tick_still_cleans_up() {
        let mut bench = Bench::default();
        let mut unit = Unit::new(Tracer::forever("tracer"));
        unit.end(&mut bench, EndReason::Interrupted).unwrap();
        assert_eq!(count(&bench, "tracer", "start"), 0);
        assert_eq!(count(&bench, "tracer", "interrupted"), 1);
    }

    #[test]
    fn test_end_reason_interrupted() {
        assert!(!EndReason::Completed.is_interrupted());
        assert!(EndReason::Interrupted.is_interrupted());
        assert!(EndReason::RacedOut.is_interrupted());
    }
}
