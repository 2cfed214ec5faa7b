//! Sample-to-notification pipeline: filter, detect, notify.

use tiltscrub_common::config::{OrientationConfig, ThresholdConfig};
use tiltscrub_common::error::TiltscrubResult;
use tiltscrub_sensor_model::OrientationSample;

use crate::change::ChangeDetector;
use crate::filter::OrientationFilter;

/// Receives filtered orientation whenever a reportable change occurs.
pub trait OrientationListener {
    fn on_orientation_change(&mut self, orientation: &OrientationSample);
}

impl<F> OrientationListener for F
where
    F: FnMut(&OrientationSample),
{
    fn on_orientation_change(&mut self, orientation: &OrientationSample) {
        self(orientation)
    }
}

/// Owns a filter and a change detector and notifies one listener.
pub struct OrientationController {
    filter: OrientationFilter,
    detector: ChangeDetector,
    listener: Option<Box<dyn OrientationListener>>,
    samples_seen: u64,
    changes_reported: u64,
}

impl OrientationController {
    /// Controller with no listener registered.
    pub fn new(filter: OrientationFilter, detector: ChangeDetector) -> Self {
        Self {
            filter,
            detector,
            listener: None,
            samples_seen: 0,
            changes_reported: 0,
        }
    }

    /// Build filter and detector from the orientation config section.
    pub fn from_config(config: &OrientationConfig) -> TiltscrubResult<Self> {
        Ok(Self::new(
            OrientationFilter::from_config(config)?,
            ChangeDetector::new(config.threshold)?,
        ))
    }

    /// Register the change listener, replacing any previous one.
    pub fn set_listener(&mut self, listener: impl OrientationListener + 'static) {
        self.listener = Some(Box::new(listener));
    }

    /// Drop the registered listener.
    pub fn clear_listener(&mut self) {
        self.listener = None;
    }

    /// Process one raw sample.
    ///
    /// Returns the filtered orientation when a change was reported (after the
    /// listener ran), `None` otherwise. Samples with a non-finite axis are
    /// dropped before they reach the filter.
    pub fn on_sample(&mut self, raw: &OrientationSample) -> Option<OrientationSample> {
        if !raw.is_finite() {
            tracing::debug!(?raw, "Dropping non-finite orientation sample");
            return None;
        }
        self.samples_seen += 1;

        let current = self.filter.apply(raw);
        if !self.detector.check(&current) {
            return None;
        }

        self.changes_reported += 1;
        tracing::trace!(
            alpha = current.alpha,
            beta = current.beta,
            gamma = current.gamma,
            "Orientation changed"
        );
        if let Some(listener) = self.listener.as_mut() {
            listener.on_orientation_change(&current);
        }
        Some(current)
    }

    /// Current filtered estimate.
    pub fn current(&self) -> OrientationSample {
        self.filter.current()
    }

    /// Last reported orientation.
    pub fn previous(&self) -> OrientationSample {
        self.detector.previous()
    }

    /// Per-axis change thresholds in effect.
    pub fn threshold(&self) -> ThresholdConfig {
        self.detector.threshold()
    }

    /// Replace all thresholds. Rejects non-positive values.
    pub fn set_threshold(&mut self, threshold: ThresholdConfig) -> TiltscrubResult<()> {
        self.detector.set_threshold(threshold)
    }

    /// Replace the gamma threshold only.
    pub fn set_gamma_threshold(&mut self, gamma: f64) -> TiltscrubResult<()> {
        self.detector.set_gamma_threshold(gamma)?;
        tracing::debug!(gamma, "Gamma change threshold updated");
        Ok(())
    }

    /// Mutable access to the smoothing filter, for retuning.
    pub fn filter_mut(&mut self) -> &mut OrientationFilter {
        &mut self.filter
    }

    /// Samples accepted so far.
    pub fn samples_seen(&self) -> u64 {
        self.samples_seen
    }

    /// Changes reported so far.
    pub fn changes_reported(&self) -> u64 {
        self.changes_reported
    }
}
