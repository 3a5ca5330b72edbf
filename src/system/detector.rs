//! Object Detection
//!
//! Decides whether the intake holds an object from a single color/proximity
//! sample.
//!
//! # Algorithm
//! - Very close readings (proximity above the near threshold) saturate the
//!   color channels, so red and blue are scaled by `near / proximity`
//! - The object is present when it is close enough, red enough, not too blue
//!   and redder than it is green
//!
//! The verdict depends only on the sample. There is no filtering and no
//! hysteresis: identical samples always give identical verdicts.

use crate::system::config::DetectorThresholds;
use crate::system::sensor::RawSensorSample;

/// Color signature discriminator
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ObjectDetector {
    thresholds: DetectorThresholds,
}

impl ObjectDetector {
    pub const fn new(thresholds: DetectorThresholds) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &DetectorThresholds {
        &self.thresholds
    }

    /// Returns true when the sample matches the object's color signature
    pub fn detect(&self, sample: &RawSensorSample) -> bool {
        let t = &self.thresholds;
        let (red, blue) = self.compensate(sample);

        sample.proximity > t.min_proximity
            && red > t.min_red
            && blue < t.max_blue
            && red > sample.green
    }

    /// Red and blue scaled for close range, truncated like the raw readings
    fn compensate(&self, sample: &RawSensorSample) -> (u32, u32) {
        let near = self.thresholds.near_proximity;
        if sample.proximity <= near {
            return (sample.red, sample.blue);
        }

        let scale = |value: u32| {
            (u64::from(value) * u64::from(near) / u64::from(sample.proximity)) as u32
        };
        (scale(sample.red), scale(sample.blue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detector() -> ObjectDetector {
        ObjectDetector::new(DetectorThresholds::DEFAULT)
    }

    #[test]
    fn test_close_object_is_compensated_and_detected() {
        // red 900 * 0.8 = 720, blue 500 * 0.8 = 400
        let sample = RawSensorSample::new(2000, 900, 100, 500, 0);
        assert!(detector().detect(&sample));
    }

    #[test]
    fn test_far_readings_never_detect() {
        for proximity in [0, 150, 299, 300] {
            let sample = RawSensorSample::new(proximity, 5000, 0, 0, 0);
            assert!(!detector().detect(&sample), "proximity {}", proximity);
        }
    }

    #[test]
    fn test_compensation_can_drop_red_below_threshold() {
        // Raw red passes, compensated red (800 * 1600 / 2047 = 625) does not
        let sample = RawSensorSample::new(2047, 800, 100, 500, 0);
        assert!(!detector().detect(&sample));

        // Same color at the near threshold is not compensated
        let sample = RawSensorSample::new(1600, 800, 100, 500, 0);
        assert!(detector().detect(&sample));
    }

    #[test]
    fn test_each_threshold_rejects() {
        let base = RawSensorSample::new(1000, 900, 100, 500, 0);
        assert!(detector().detect(&base));

        let dim = RawSensorSample { red: 700, ..base };
        assert!(!detector().detect(&dim), "red must exceed 700");

        let blue = RawSensorSample { blue: 9000, ..base };
        assert!(!detector().detect(&blue), "blue must stay below 9000");

        let green = RawSensorSample { green: 900, ..base };
        assert!(!detector().detect(&green), "red must exceed green");
    }

    #[test]
    fn test_green_is_compared_uncompensated() {
        // Compensated red 720 is below raw green 800 even though raw red is above it
        let sample = RawSensorSample::new(2000, 900, 800, 500, 0);
        assert!(!detector().detect(&sample));
    }

    #[test]
    fn test_verdict_is_repeatable() {
        let d = detector();
        let sample = RawSensorSample::new(1800, 1200, 300, 7000, 12);
        let first = d.detect(&sample);
        for _ in 0..10 {
            assert_eq!(d.detect(&sample), first);
        }
    }

    #[test]
    fn test_custom_thresholds() {
        let d = ObjectDetector::new(DetectorThresholds {
            min_red: 100,
            ..DetectorThresholds::DEFAULT
        });
        let sample = RawSensorSample::new(500, 150, 50, 20, 0);
        assert!(d.detect(&sample));
        assert!(!detector().detect(&sample));
    }
}
