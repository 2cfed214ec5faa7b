//! Orientation sample sources.
//!
//! Each source provides a different way to obtain samples: replaying a
//! recorded trace, or generating a deterministic sweep for demos and tests.

use std::path::Path;

use tiltscrub_common::error::{TiltscrubError, TiltscrubResult};
use tiltscrub_sensor_model::{
    load_trace, OrientationSample, SampleTrace, SensorCapabilities, TimedSample,
};

/// Trait for orientation sample providers.
pub trait OrientationSource {
    /// Poll for the next sample. Returns `None` once no sample is available.
    fn poll(&mut self) -> TiltscrubResult<Option<TimedSample>>;

    /// Source name for logging.
    fn name(&self) -> &str;

    /// Signals the underlying device reports as available.
    fn capabilities(&self) -> SensorCapabilities;
}

/// Log a warning for every missing sensor signal.
///
/// Diagnostic only: returns whether device orientation itself is available,
/// but callers keep polling either way.
pub fn log_capabilities(source: &dyn OrientationSource) -> bool {
    let capabilities = source.capabilities();
    for signal in capabilities.missing() {
        tracing::warn!(source = %source.name(), "{signal} is not available");
    }
    if capabilities.orientation {
        tracing::info!(source = %source.name(), "Orientation source ready");
    }
    capabilities.orientation
}

/// Replays samples from a recorded trace.
pub struct ReplaySource {
    samples: Vec<TimedSample>,
    index: usize,
    capabilities: SensorCapabilities,
}

impl ReplaySource {
    /// Replay an already parsed trace.
    pub fn from_trace(trace: SampleTrace) -> Self {
        let capabilities = trace.capabilities();
        Self {
            samples: trace.samples,
            index: 0,
            capabilities,
        }
    }

    /// Load a trace file.
    pub fn open(path: impl AsRef<Path>) -> TiltscrubResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(TiltscrubError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let trace = load_trace(path).map_err(|e| TiltscrubError::trace(e.to_string()))?;
        tracing::debug!(path = %path.display(), samples = trace.samples.len(), "Trace loaded");
        Ok(Self::from_trace(trace))
    }

    /// Samples not yet polled.
    pub fn remaining(&self) -> usize {
        self.samples.len() - self.index
    }
}

impl OrientationSource for ReplaySource {
    fn poll(&mut self) -> TiltscrubResult<Option<TimedSample>> {
        let next = self.samples.get(self.index).copied();
        if next.is_some() {
            self.index += 1;
        }
        Ok(next)
    }

    fn name(&self) -> &str {
        "replay"
    }

    fn capabilities(&self) -> SensorCapabilities {
        self.capabilities
    }
}

/// Deterministic left/right tilt sweep with alternating jitter.
///
/// Gamma follows `amplitude * sin(2π t / period)`, and every other sample is
/// pushed up or down by `jitter` degrees to imitate sensor noise. Beta holds
/// a constant upright pose.
#[derive(Debug, Clone)]
pub struct SweepSource {
    sample_rate_hz: f64,
    amplitude: f64,
    period_secs: f64,
    jitter: f64,
    total_samples: u64,
    index: u64,
}

/// Beta reported by the sweep: device held upright in portrait.
const SWEEP_BETA: f64 = 45.0;

impl SweepSource {
    /// Sinusoidal gamma sweep lasting `duration_secs`.
    pub fn new(
        sample_rate_hz: f64,
        amplitude: f64,
        period_secs: f64,
        jitter: f64,
        duration_secs: f64,
    ) -> TiltscrubResult<Self> {
        if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
            return Err(TiltscrubError::sensor(format!(
                "sample rate must be positive, got {sample_rate_hz}"
            )));
        }
        if !(period_secs.is_finite() && period_secs > 0.0) {
            return Err(TiltscrubError::sensor(format!(
                "sweep period must be positive, got {period_secs}"
            )));
        }
        let total_samples = (duration_secs.max(0.0) * sample_rate_hz).floor() as u64;
        Ok(Self {
            sample_rate_hz,
            amplitude,
            period_secs,
            jitter,
            total_samples,
            index: 0,
        })
    }

    /// Sample at a given index, without advancing.
    pub fn sample_at(&self, index: u64) -> TimedSample {
        let t = index as f64 / self.sample_rate_hz;
        let phase = std::f64::consts::TAU * t / self.period_secs;
        let noise = if index % 2 == 0 {
            self.jitter
        } else {
            -self.jitter
        };
        TimedSample::new(
            (t * 1_000_000_000.0).round() as u64,
            OrientationSample::new(0.0, SWEEP_BETA, self.amplitude * phase.sin() + noise),
        )
    }

    /// Samples the sweep will produce in total.
    pub fn total_samples(&self) -> u64 {
        self.total_samples
    }
}

impl OrientationSource for SweepSource {
    fn poll(&mut self) -> TiltscrubResult<Option<TimedSample>> {
        if self.index >= self.total_samples {
            return Ok(None);
        }
        let sample = self.sample_at(self.index);
        self.index += 1;
        Ok(Some(sample))
    }

    fn name(&self) -> &str {
        "sweep"
    }

    fn capabilities(&self) -> SensorCapabilities {
        SensorCapabilities::orientation_only()
    }
}
