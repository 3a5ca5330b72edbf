//! Command Scheduler
//!
//! Holds the commands that are currently running and ticks each of them once
//! per control period, in the order they were scheduled. Finished commands
//! are dropped at the end of the tick that finished them.
//!
//! # Requirements
//! Scheduling a command that needs a mechanism already in use interrupts the
//! running command first, so two commands never drive the same mechanism.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::system::command::{Command, EndReason, Requirements, Unit};

/// Handle to a scheduled command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ScheduleId(u32);

pub struct Scheduler<R> {
    active: Vec<(ScheduleId, Unit<R>)>,
    next_id: u32,
}

impl<R> Default for Scheduler<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R> Scheduler<R> {
    pub const fn new() -> Self {
        Self {
            active: Vec::new(),
            next_id: 0,
        }
    }

    pub fn schedule(&mut self, robot: &mut R, command: impl Command<R> + 'static) -> ScheduleId {
        self.schedule_boxed(robot, Box::new(command))
    }

    /// Adds a command, interrupting running commands that share a requirement
    ///
    /// The new command starts on the next [`Scheduler::run`].
    pub fn schedule_boxed(&mut self, robot: &mut R, command: Box<dyn Command<R>>) -> ScheduleId {
        let unit = Unit::from_boxed(command);
        let requirements = unit.requirements();

        if !requirements.is_empty() {
            self.active.retain_mut(|(_, running)| {
                if running.requirements().intersects(requirements) {
                    log_info!("{} interrupted by {}", running.name(), unit.name());
                    let _ = running.end(robot, EndReason::Interrupted);
                    false
                } else {
                    true
                }
            });
        }

        let id = ScheduleId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.active.push((id, unit));
        id
    }

    /// Ticks every scheduled command once
    pub fn run(&mut self, robot: &mut R) {
        for (_, unit) in self.active.iter_mut() {
            unit.tick(robot);
        }
        self.active.retain(|(_, unit)| !unit.is_ended());
    }

    /// Interrupts one command; false when it is no longer scheduled
    pub fn cancel(&mut self, robot: &mut R, id: ScheduleId) -> bool {
        let Some(index) = self.active.iter().position(|(active, _)| *active == id) else {
            return false;
        };
        let (_, mut unit) = self.active.remove(index);
        let _ = unit.end(robot, EndReason::Interrupted);
        true
    }

    /// Interrupts every scheduled command
    pub fn cancel_all(&mut self, robot: &mut R) {
        for (_, mut unit) in self.active.drain(..) {
            let _ = unit.end(robot, EndReason::Interrupted);
        }
    }

    /// True when a scheduled command uses any of `requirements`
    pub fn is_required(&self, requirements: Requirements) -> bool {
        self.active
            .iter()
            .any(|(_, unit)| unit.requirements().intersects(requirements))
    }

    pub fn is_scheduled(&self, id: ScheduleId) -> bool {
        self.active.iter().any(|(active, _)| *active == id)
    }

    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::command::testing::*;

    #[test]
    fn test_finished_commands_are_dropped() {
        let mut bench = Bench::default();
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(&mut bench, Tracer::finishing_after("short", 2));

        scheduler.run(&mut bench);
        assert!(scheduler.is_scheduled(id));
        scheduler.run(&mut bench);
        assert!(!scheduler.is_scheduled(id));
        assert!(scheduler.is_empty());
        assert_eq!(count(&bench, "short", "completed"), 1);
    }

    #[test]
    fn test_conflicting_requirement_interrupts() {
        let mut bench = Bench::default();
        let mut scheduler = Scheduler::new();
        let old = scheduler.schedule(
            &mut bench,
            Tracer::forever("old").requiring(Requirements::INTAKE),
        );
        let other = scheduler.schedule(
            &mut bench,
            Tracer::forever("other").requiring(Requirements::SHOOTER),
        );
        scheduler.run(&mut bench);

        let new = scheduler.schedule(
            &mut bench,
            Tracer::forever("new").requiring(Requirements::INTAKE | Requirements::INDICATOR),
        );
        assert_eq!(count(&bench, "old", "interrupted"), 1);
        assert!(!scheduler.is_scheduled(old));
        assert!(scheduler.is_scheduled(other));
        assert!(scheduler.is_scheduled(new));
        assert!(scheduler.is_required(Requirements::INDICATOR));
    }

    #[test]
    fn test_requirement_released_when_done() {
        let mut bench = Bench::default();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(
            &mut bench,
            Tracer::finishing_after("blink", 1).requiring(Requirements::INDICATOR),
        );
        assert!(scheduler.is_required(Requirements::INDICATOR));

        scheduler.run(&mut bench);
        assert!(!scheduler.is_required(Requirements::INDICATOR));
    }

    #[test]
    fn test_cancel_runs_cleanup_once() {
        let mut bench = Bench::default();
        let mut scheduler = Scheduler::new();
        let id = scheduler.schedule(&mut bench, Tracer::forever("tracer"));
        scheduler.run(&mut bench);

        assert!(scheduler.cancel(&mut bench, id));
        assert!(!scheduler.cancel(&mut bench, id));
        assert_eq!(count(&bench, "tracer", "interrupted"), 1);
    }

    #[test]
    fn test_cancel_all_covers_unstarted() {
        let mut bench = Bench::default();
        let mut scheduler = Scheduler::new();
        scheduler.schedule(&mut bench, Tracer::forever("a"));
        scheduler.run(&mut bench);
        scheduler.schedule(&mut bench, Tracer::forever("b"));

        scheduler.cancel_all(&mut bench);
        assert!(scheduler.is_empty());
        assert_eq!(count(&bench, "a", "interrupted"), 1);
        assert_eq!(count(&bench, "b", "interrupted"), 1);
        assert_eq!(count(&bench, "b", "start"), 0);
    }
}
