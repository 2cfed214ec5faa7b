//! Orientation smoothing.
//!
//! Turns noisy raw samples into a running estimate. The filter owns the
//! estimate and mutates it on every [`OrientationFilter::apply`]; the value it
//! returns is always the stored estimate.

use tiltscrub_common::config::{validate_coefficient, FilterKind, OrientationConfig};
use tiltscrub_common::error::TiltscrubResult;
use tiltscrub_sensor_model::OrientationSample;

/// Stateful per-axis smoothing filter.
#[derive(Debug, Clone)]
pub struct OrientationFilter {
    kind: FilterKind,
    coefficient: f64,
    current: OrientationSample,
}

impl OrientationFilter {
    /// Create a filter starting from the zero orientation.
    ///
    /// `coefficient` is the weight of each new sample and must lie in (0, 1)
    /// for [`FilterKind::LowPass`]. It is ignored for [`FilterKind::None`].
    pub fn new(kind: FilterKind, coefficient: f64) -> TiltscrubResult<Self> {
        validate_coefficient(kind, coefficient)?;
        Ok(Self {
            kind,
            coefficient,
            current: OrientationSample::ZERO,
        })
    }

    /// A filter that reports every sample unchanged.
    pub fn passthrough() -> Self {
        Self {
            kind: FilterKind::None,
            coefficient: 0.0,
            current: OrientationSample::ZERO,
        }
    }

    /// Build from the orientation section of the app config.
    pub fn from_config(config: &OrientationConfig) -> TiltscrubResult<Self> {
        Self::new(config.filter_type, config.coefficient)
    }

    /// Switch filter kind and coefficient. The current estimate is kept.
    pub fn configure(&mut self, kind: FilterKind, coefficient: f64) -> TiltscrubResult<()> {
        validate_coefficient(kind, coefficient)?;
        self.kind = kind;
        self.coefficient = coefficient;
        tracing::debug!(%kind, coefficient, "Orientation filter configured");
        Ok(())
    }

    /// Fold one raw sample into the estimate and return the new estimate.
    pub fn apply(&mut self, sample: &OrientationSample) -> OrientationSample {
        match self.kind {
            FilterKind::None => {
                self.current = *sample;
            }
            FilterKind::LowPass => {
                let c = self.coefficient;
                self.current.alpha = low_pass_step(self.current.alpha, sample.alpha, c);
                self.current.beta = low_pass_step(self.current.beta, sample.beta, c);
                self.current.gamma = low_pass_step(self.current.gamma, sample.gamma, c);
            }
        }
        self.current
    }

    /// Current estimate.
    pub fn current(&self) -> OrientationSample {
        self.current
    }

    /// Overwrite the estimate.
    pub fn reset(&mut self, to: OrientationSample) {
        self.current = to;
    }

    /// Active filter kind.
    pub fn kind(&self) -> FilterKind {
        self.kind
    }

    /// Weight given to each new sample by the low-pass filter.
    pub fn coefficient(&self) -> f64 {
        self.coefficient
    }
}

/// Single-pole low-pass step: `current + coefficient * (sample - current)`,
/// which equals `current * (1 - coefficient) + sample * coefficient`.
fn low_pass_step(current: f64, sample: f64, coefficient: f64) -> f64 {
    current + coefficient * (sample - current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_passthrough_reports_last_sample() {
        let mut filter = OrientationFilter::new(FilterKind::None, 0.5).unwrap();
        for s in [
            OrientationSample::new(1.0, 2.0, 3.0),
            OrientationSample::new(-40.0, 0.25, 17.0),
        ] {
            assert_eq!(filter.apply(&s), s);
            assert_eq!(filter.current(), s);
        }
    }

    #[test]
    fn test_low_pass_single_step() {
        let mut filter = OrientationFilter::new(FilterKind::LowPass, 0.25).unwrap();
        let out = filter.apply(&OrientationSample::new(8.0, -4.0, 100.0));
        assert!((out.alpha - 2.0).abs() < 1e-12);
        assert!((out.beta + 1.0).abs() < 1e-12);
        assert!((out.gamma - 25.0).abs() < 1e-12);
        assert_eq!(out, filter.current());
    }

    #[test]
    fn test_low_pass_matches_blend_form() {
        let c = 0.1;
        let mut filter = OrientationFilter::new(FilterKind::LowPass, c).unwrap();
        let mut blended = 0.0_f64;
        for raw in [5.0, -3.0, 12.0, 12.0, 0.5] {
            blended = blended * (1.0 - c) + raw * c;
            let out = filter.apply(&OrientationSample::tilt(raw));
            assert!((out.gamma - blended).abs() < 1e-12);
        }
    }

    #[test]
    fn test_rejects_coefficient_outside_unit_interval() {
        assert!(OrientationFilter::new(FilterKind::LowPass, 0.0).is_err());
        assert!(OrientationFilter::new(FilterKind::LowPass, 1.0).is_err());
        assert!(OrientationFilter::new(FilterKind::LowPass, f64::NAN).is_err());

        let mut filter = OrientationFilter::passthrough();
        assert!(filter.configure(FilterKind::LowPass, 1.5).is_err());
        assert_eq!(filter.kind(), FilterKind::None);
    }

    #[test]
    fn test_configure_keeps_estimate() {
        let mut filter = OrientationFilter::passthrough();
        filter.apply(&OrientationSample::tilt(10.0));
        filter.configure(FilterKind::LowPass, 0.5).unwrap();
        let out = filter.apply(&OrientationSample::tilt(20.0));
        assert!((out.gamma - 15.0).abs() < 1e-12);
    }

    proptest! {
        #[test]
        fn low_pass_converges_toward_constant_input(
            coefficient in 0.01f64..0.99,
            target in -180.0f64..180.0,
            start in -180.0f64..180.0,
            steps in 1usize..200,
        ) {
            let mut filter = OrientationFilter::new(FilterKind::LowPass, coefficient).unwrap();
            filter.reset(OrientationSample::tilt(start));
            let sample = OrientationSample::tilt(target);

            let mut distance = (start - target).abs();
            for _ in 0..steps {
                let out = filter.apply(&sample);
                let next = (out.gamma - target).abs();
                prop_assert!(next <= distance + 1e-9);
                distance = next;
            }
        }

        #[test]
        fn low_pass_fixed_point_is_stable(
            coefficient in 0.01f64..0.99,
            value in -180.0f64..180.0,
        ) {
            let mut filter = OrientationFilter::new(FilterKind::LowPass, coefficient).unwrap();
            let sample = OrientationSample::new(value, value / 2.0, -value);
            filter.reset(sample);
            for _ in 0..10 {
                prop_assert_eq!(filter.apply(&sample), sample);
            }
        }
    }
}
