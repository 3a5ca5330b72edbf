//! Pose Feedback
//!
//! The feedback loop runs in its own task at a coarser rate than the control
//! loop. The only state it shares with the control side is the latest pose,
//! kept in a critical-section cell: each side writes whole values, and a
//! reader tolerates a value one period old.
//!
//! The loop stamps a heartbeat every period. The control loop checks it; a
//! loop whose heartbeat went stale is asked to stop, and once it has exited
//! the control loop spawns a fresh one.

use core::cell::Cell;

use critical_section::Mutex;
use embassy_futures::select::{select, Either};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Instant, Ticker};

/// Planar robot pose
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Pose2d {
    pub x: f32,
    pub y: f32,
    /// Radians, counter-clockwise
    pub heading: f32,
}

impl Pose2d {
    pub const ORIGIN: Self = Self {
        x: 0.0,
        y: 0.0,
        heading: 0.0,
    };

    pub const fn new(x: f32, y: f32, heading: f32) -> Self {
        Self { x, y, heading }
    }
}

/// Pose cell plus liveness state of the loop that feeds it
pub struct PoseFeedback {
    pose: Mutex<Cell<Pose2d>>,
    heartbeat: Mutex<Cell<Option<Instant>>>,
    running: Mutex<Cell<bool>>,
    stop: Signal<CriticalSectionRawMutex, ()>,
}

impl PoseFeedback {
    pub const fn new() -> Self {
        Self {
            pose: Mutex::new(Cell::new(Pose2d::ORIGIN)),
            heartbeat: Mutex::new(Cell::new(None)),
            running: Mutex::new(Cell::new(false)),
            stop: Signal::new(),
        }
    }

    /// Feedback loop body; returns once a stop is requested
    ///
    /// No camera on this board, so the estimate is carried forward unchanged
    /// and only the heartbeat moves.
    pub async fn run(&self, period: Duration) {
        self.mark_started(Instant::now());
        log_info!("Pose feedback started");

        let mut ticker = Ticker::every(period);
        loop {
            self.beat(self.pose(), Instant::now());
            if let Either::Second(()) = select(ticker.next(), self.stop.wait()).await {
                break;
            }
        }

        self.mark_exited();
        log_info!("Pose feedback stopped");
    }

    pub fn pose(&self) -> Pose2d {
        critical_section::with(|cs| self.pose.borrow(cs).get())
    }

    /// Stores a pose without touching the heartbeat
    pub fn set_pose(&self, pose: Pose2d) {
        critical_section::with(|cs| self.pose.borrow(cs).set(pose));
    }

    /// Called by the loop when it starts; drops any stale stop request
    pub fn mark_started(&self, now: Instant) {
        self.stop.reset();
        critical_section::with(|cs| {
            self.running.borrow(cs).set(true);
            self.heartbeat.borrow(cs).set(Some(now));
        });
    }

    /// Called by the loop every period with its latest pose
    pub fn beat(&self, pose: Pose2d, now: Instant) {
        critical_section::with(|cs| {
            self.pose.borrow(cs).set(pose);
            self.heartbeat.borrow(cs).set(Some(now));
        });
    }

    /// Called by the loop when it exits
    pub fn mark_exited(&self) {
        critical_section::with(|cs| self.running.borrow(cs).set(false));
    }

    /// Asks the running loop to exit after its current pass
    pub fn request_stop(&self) {
        self.stop.signal(());
    }

    /// True while a stop request is waiting to be seen by the loop
    pub fn stop_requested(&self) -> bool {
        self.stop.signaled()
    }

    /// True between `mark_started` and `mark_exited`
    pub fn is_running(&self) -> bool {
        critical_section::with(|cs| self.running.borrow(cs).get())
    }

    /// True while the loop runs and has beaten within `stale_after`
    pub fn is_alive(&self, now: Instant, stale_after: Duration) -> bool {
        critical_section::with(|cs| {
            self.running.borrow(cs).get()
                && self
                    .heartbeat
                    .borrow(cs)
                    .get()
                    .is_some_and(|beat| now.saturating_duration_since(beat) <= stale_after)
        })
    }
}

impl Default for PoseFeedback {
    fn default() -> Self {
        Self::new()
    }
}

/// What the control loop has to do about the feedback loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Recovery {
    /// Loop is beating
    Healthy,
    /// Loop went quiet; a stop was just requested
    Stopping,
    /// Loop has exited; spawn a new one
    Restart,
    /// Nothing to do this tick
    Waiting,
}

/// Decides how to bring a silent feedback loop back
///
/// A loop that is still marked running but stopped beating is asked to stop
/// first, since its task slot must be free before it can be spawned again.
/// Restarts happen at most once per `stale_after`, giving a fresh loop time to
/// report in.
#[derive(Debug, Default)]
pub struct Supervisor {
    last_restart: Option<Instant>,
}

impl Supervisor {
    pub const fn new() -> Self {
        Self { last_restart: None }
    }

    pub fn check(&mut self, feedback: &PoseFeedback, now: Instant, stale_after: Duration) -> Recovery {
        if feedback.is_alive(now, stale_after) {
            return Recovery::Healthy;
        }
        if feedback.is_running() {
            if feedback.stop_requested() {
                return Recovery::Waiting;
            }
            feedback.request_stop();
            return Recovery::Stopping;
        }
        let waited = self
            .last_restart
            .map_or(true, |last| now.saturating_duration_since(last) >= stale_after);
        if !waited {
            return Recovery::Waiting;
        }
        self.last_restart = Some(now);
        Recovery::Restart
    }
}
