//! Robot Configuration
//!
//! Tuning constants for the intake, shooter, indicator and control loop.
//! Values are grouped per mechanism and collected in [`RobotConfig::DEFAULT`].
//!
//! # Sensor Thresholds
//! - Near proximity (1600): above this the color readings saturate and are
//!   attenuated by `near / proximity`
//! - Minimum proximity (300): anything farther away is never an object
//! - Minimum red (700) and maximum blue (9000) describe the object's color
//!   signature

use embassy_time::Duration;

/// Color/proximity thresholds used by the object detector
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DetectorThresholds {
    /// Proximity above which color values are compensated
    pub near_proximity: u32,
    /// Proximity that must be exceeded for any detection
    pub min_proximity: u32,
    /// Compensated red must exceed this value
    pub min_red: u32,
    /// Compensated blue must stay below this value
    pub max_blue: u32,
}

impl DetectorThresholds {
    pub const DEFAULT: Self = Self {
        near_proximity: 1600,
        min_proximity: 300,
        min_red: 700,
        max_blue: 9000,
    };
}

impl Default for DetectorThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// What a motor does when it is told to stop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IdleMode {
    /// Short the windings, stopping quickly
    Brake,
    /// Let the motor spin down freely
    Coast,
}

/// Normalized intake speeds in [-1, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntakeSpeeds {
    /// Arm roller speed while intaking
    pub arm_run: f32,
    /// Ground roller speed while intaking
    pub ground_run: f32,
    /// Arm roller speed while pushing the object into the shooter
    pub push_to_shooter: f32,
    /// Speed used to back an object out of the intake (negative)
    pub eject: f32,
    /// Arm roller idle behavior
    pub arm_idle: IdleMode,
    /// Ground roller idle behavior
    pub ground_idle: IdleMode,
}

impl IntakeSpeeds {
    pub const DEFAULT: Self = Self {
        arm_run: 0.6,
        ground_run: 0.8,
        push_to_shooter: 1.0,
        eject: -0.5,
        arm_idle: IdleMode::Brake,
        ground_idle: IdleMode::Coast,
    };
}

impl Default for IntakeSpeeds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Shooter flywheel settings
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ShooterConfig {
    /// Normalized speed for a shot
    pub run_speed: f32,
    /// Supply voltage a normalized speed of 1.0 maps to
    pub nominal_voltage: f32,
    /// Time the flywheel gets before the object is pushed in
    pub spin_up: Duration,
    /// Flywheel idle behavior
    pub idle: IdleMode,
}

impl ShooterConfig {
    pub const DEFAULT: Self = Self {
        run_speed: 1.0,
        nominal_voltage: 12.0,
        spin_up: Duration::from_millis(750),
        idle: IdleMode::Coast,
    };
}

impl Default for ShooterConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Loop periods and command time bounds
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timing {
    /// Control loop period
    pub tick_period: Duration,
    /// Upper bound for pushing an object into the shooter
    pub push_timeout: Duration,
    /// Indicator toggle interval while waiting for an object
    pub blink_interval: Duration,
    /// Pose feedback loop period
    pub feedback_period: Duration,
    /// Pose feedback loop counts as dead after this long without a heartbeat
    pub feedback_stale_after: Duration,
    /// Telemetry report interval
    pub telemetry_period: Duration,
    /// Upper bound for a single color sensor transaction sequence
    pub sensor_timeout: Duration,
    /// Wait between failed color sensor setup attempts
    pub sensor_retry: Duration,
}

impl Timing {
    pub const DEFAULT: Self = Self {
        tick_period: Duration::from_millis(20),
        push_timeout: Duration::from_millis(500),
        blink_interval: Duration::from_millis(100),
        feedback_period: Duration::from_millis(200),
        feedback_stale_after: Duration::from_millis(1000),
        telemetry_period: Duration::from_millis(250),
        sensor_timeout: Duration::from_millis(10),
        sensor_retry: Duration::from_millis(1000),
    };
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Complete robot configuration
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RobotConfig {
    pub detector: DetectorThresholds,
    pub intake: IntakeSpeeds,
    pub shooter: ShooterConfig,
    pub timing: Timing,
}

impl RobotConfig {
    pub const DEFAULT: Self = Self {
        detector: DetectorThresholds::DEFAULT,
        intake: IntakeSpeeds::DEFAULT,
        shooter: ShooterConfig::DEFAULT,
        timing: Timing::DEFAULT,
    };
}
