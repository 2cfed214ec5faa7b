//! Threshold-based change detection on filtered orientation.

use tiltscrub_common::config::ThresholdConfig;
use tiltscrub_common::error::{TiltscrubError, TiltscrubResult};
use tiltscrub_sensor_model::OrientationSample;

/// Report whether `current` moved past `threshold` on any axis since
/// `previous`.
///
/// Axes are independent: one axis over its own threshold is enough. When a
/// change is reported every axis of `previous` is rebaselined to `current`,
/// not only the axis that tripped.
pub fn has_changed(
    current: &OrientationSample,
    previous: &mut OrientationSample,
    threshold: &ThresholdConfig,
) -> bool {
    let delta = current.delta(previous);

    let changed = delta.alpha.abs() > threshold.alpha
        || delta.beta.abs() > threshold.beta
        || delta.gamma.abs() > threshold.gamma;

    if changed {
        *previous = *current;
    }

    changed
}

/// Owns the reporting baseline and the per-axis thresholds.
#[derive(Debug, Clone)]
pub struct ChangeDetector {
    threshold: ThresholdConfig,
    previous: OrientationSample,
}

impl ChangeDetector {
    /// Create a detector with a zero baseline.
    pub fn new(threshold: ThresholdConfig) -> TiltscrubResult<Self> {
        threshold.validate()?;
        Ok(Self {
            threshold,
            previous: OrientationSample::ZERO,
        })
    }

    /// Check `current` against the baseline, rebaselining on change.
    pub fn check(&mut self, current: &OrientationSample) -> bool {
        has_changed(current, &mut self.previous, &self.threshold)
    }

    /// The last reported orientation.
    pub fn previous(&self) -> OrientationSample {
        self.previous
    }

    /// Per-axis thresholds in effect.
    pub fn threshold(&self) -> ThresholdConfig {
        self.threshold
    }

    /// Replace all thresholds.
    pub fn set_threshold(&mut self, threshold: ThresholdConfig) -> TiltscrubResult<()> {
        threshold.validate()?;
        self.threshold = threshold;
        Ok(())
    }

    /// Replace only the gamma threshold.
    pub fn set_gamma_threshold(&mut self, gamma: f64) -> TiltscrubResult<()> {
        if !(gamma.is_finite() && gamma > 0.0) {
            return Err(TiltscrubError::config(format!(
                "threshold.gamma must be positive, got {gamma}"
            )));
        }
        self.threshold.gamma = gamma;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_thresholds_is_unchanged() {
        let threshold = ThresholdConfig {
            alpha: 2.0,
            beta: 2.0,
            gamma: 0.5,
        };
        let mut previous = OrientationSample::new(10.0, 10.0, 10.0);
        let current = OrientationSample::new(12.0, 8.0, 10.5);

        assert!(!has_changed(&current, &mut previous, &threshold));
        assert_eq!(previous, OrientationSample::new(10.0, 10.0, 10.0));
    }

    #[test]
    fn test_single_axis_trips_and_rebaselines_all_axes() {
        let threshold = ThresholdConfig {
            alpha: 5.0,
            beta: 5.0,
            gamma: 1.0,
        };
        let mut previous = OrientationSample::ZERO;
        let current = OrientationSample::new(3.0, -4.0, 1.5);

        assert!(has_changed(&current, &mut previous, &threshold));
        assert_eq!(previous, current);
    }

    #[test]
    fn test_each_axis_uses_its_own_threshold() {
        let threshold = ThresholdConfig {
            alpha: 10.0,
            beta: 1.0,
            gamma: 10.0,
        };
        let mut previous = OrientationSample::ZERO;
        assert!(!has_changed(
            &OrientationSample::new(9.0, 0.0, -9.0),
            &mut previous,
            &threshold
        ));
        assert!(has_changed(
            &OrientationSample::new(0.0, -1.01, 0.0),
            &mut previous,
            &threshold
        ));
    }

    #[test]
    fn test_detector_tracks_baseline() {
        let mut detector = ChangeDetector::new(ThresholdConfig::uniform(1.0)).unwrap();
        assert!(detector.check(&OrientationSample::tilt(2.0)));
        assert_eq!(detector.previous(), OrientationSample::tilt(2.0));

        // small drift from the new baseline is ignored
        assert!(!detector.check(&OrientationSample::tilt(2.9)));
        assert_eq!(detector.previous(), OrientationSample::tilt(2.0));
        assert!(detector.check(&OrientationSample::tilt(3.1)));
    }

    #[test]
    fn test_threshold_must_be_positive() {
        assert!(ChangeDetector::new(ThresholdConfig::uniform(0.0)).is_err());

        let mut detector = ChangeDetector::new(ThresholdConfig::default()).unwrap();
        assert!(detector.set_gamma_threshold(-1.0).is_err());
        detector.set_gamma_threshold(0.25).unwrap();
        assert_eq!(detector.threshold().gamma, 0.25);
        assert_eq!(detector.threshold().alpha, 1.0);
    }
}
