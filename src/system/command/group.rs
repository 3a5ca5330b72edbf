//! Command groups
//!
//! Groups own their members as [`Unit`]s, so every member gets the same
//! end-exactly-once guarantee as a top-level command.

use alloc::boxed::Box;
use alloc::vec::Vec;

use super::{Command, EndReason, Requirements, Unit};
use crate::system::error::CommandError;

/// Runs all members together until the first one finishes
///
/// Every member is ticked each period, in order. Once all of them have run,
/// the first member that completed wins and every member still running is
/// ended with [`EndReason::RacedOut`] inside the same tick, before the race
/// itself reports finished. Members that completed in that same tick keep
/// their `Completed` end. Interrupting the race interrupts
/// every member that is still running.
pub struct Race<R> {
    members: Vec<Unit<R>>,
    requirements: Requirements,
    winner: Option<usize>,
}

impl<R> Race<R> {
    /// Builds a race; an empty member list is rejected
    pub fn new(members: Vec<Box<dyn Command<R>>>) -> Result<Self, CommandError> {
        if members.is_empty() {
            return Err(CommandError::EmptyRace);
        }
        let requirements = members
            .iter()
            .fold(Requirements::empty(), |acc, member| acc | member.requirements());
        Ok(Self {
            members: members.into_iter().map(Unit::from_boxed).collect(),
            requirements,
            winner: None,
        })
    }

    /// Two-member race, which can never be empty
    pub fn pair(first: impl Command<R> + 'static, second: impl Command<R> + 'static) -> Self {
        let first = Unit::new(first);
        let second = Unit::new(second);
        let requirements = first.requirements() | second.requirements();
        Self {
            members: alloc::vec![first, second],
            requirements,
            winner: None,
        }
    }

    /// Adds another member to the race
    pub fn with(mut self, member: impl Command<R> + 'static) -> Self {
        let member = Unit::new(member);
        self.requirements |= member.requirements();
        self.members.push(member);
        self
    }

    /// Index of the member that finished first, once the race is decided
    pub fn winner(&self) -> Option<usize> {
        self.winner
    }

    fn end_losers(&mut self, robot: &mut R, winner: usize) {
        for (index, member) in self.members.iter_mut().enumerate() {
            if index != winner && !member.is_ended() {
                let _ = member.end(robot, EndReason::RacedOut);
            }
        }
    }
}

impl<R> Command<R> for Race<R> {
    fn name(&self) -> &'static str {
        "race"
    }

    fn requirements(&self) -> Requirements {
        self.requirements
    }

    fn initialize(&mut self, _robot: &mut R) {
        self.winner = None;
        for member in self.members.iter_mut() {
            member.rearm();
        }
    }

    fn execute(&mut self, robot: &mut R) {
        if self.winner.is_some() {
            return;
        }
        for member in self.members.iter_mut() {
            member.tick(robot);
        }
        if let Some(index) = self.members.iter().position(Unit::is_ended) {
            log_info!("race won by {}", self.members[index].name());
            self.winner = Some(index);
            self.end_losers(robot, index);
        }
    }

    fn is_finished(&mut self, _robot: &R) -> bool {
        self.winner.is_some()
    }

    fn end(&mut self, robot: &mut R, reason: EndReason) {
        for member in self.members.iter_mut().filter(|member| !member.is_ended()) {
            let reason = if reason.is_interrupted() {
                EndReason::Interrupted
            } else {
                reason
            };
            let _ = member.end(robot, reason);
        }
    }
}

/// Runs members one after another
///
/// A member starts on the tick after its predecessor completed. Interrupting
/// the sequence interrupts only the member currently running.
pub struct Sequence<R> {
    members: Vec<Unit<R>>,
    requirements: Requirements,
    current: usize,
}

impl<R> Sequence<R> {
    pub fn new(members: Vec<Box<dyn Command<R>>>) -> Self {
        let requirements = members
            .iter()
            .fold(Requirements::empty(), |acc, member| acc | member.requirements());
        Self {
            members: members.into_iter().map(Unit::from_boxed).collect(),
            requirements,
            current: 0,
        }
    }

    /// Appends a member
    pub fn then(mut self, member: impl Command<R> + 'static) -> Self {
        let member = Unit::new(member);
        self.requirements |= member.requirements();
        self.members.push(member);
        self
    }
}

impl<R> Command<R> for Sequence<R> {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn requirements(&self) -> Requirements {
        self.requirements
    }

    fn initialize(&mut self, _robot: &mut R) {
        self.current = 0;
        for member in self.members.iter_mut() {
            member.rearm();
        }
    }

    fn execute(&mut self, robot: &mut R) {
        if let Some(member) = self.members.get_mut(self.current) {
            member.tick(robot);
            if member.is_ended() {
                self.current += 1;
            }
        }
    }

    fn is_finished(&mut self, _robot: &R) -> bool {
        self.current >= self.members.len()
    }

    fn end(&mut self, robot: &mut R, reason: EndReason) {
        if let Some(member) = self.members.get_mut(self.current) {
            if !member.is_ended() {
                let _ = member.end(robot, reason);
            }
        }
    }
}
