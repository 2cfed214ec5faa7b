//! Orientation sample types.
//!
//! Angles follow the device-orientation convention: `alpha` is rotation
//! around the z axis, `beta` around x (front/back tilt), `gamma` around y
//! (left/right tilt). All values are degrees.

use serde::{Deserialize, Serialize};

/// Monotonic timestamp in nanoseconds since the trace started.
pub type TimestampNs = u64;

/// One 3-axis orientation reading, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct OrientationSample {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl OrientationSample {
    /// All axes at zero.
    pub const ZERO: OrientationSample = OrientationSample {
        alpha: 0.0,
        beta: 0.0,
        gamma: 0.0,
    };

    pub fn new(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self { alpha, beta, gamma }
    }

    /// A sample carrying only left/right tilt.
    pub fn tilt(gamma: f64) -> Self {
        Self {
            alpha: 0.0,
            beta: 0.0,
            gamma,
        }
    }

    /// Copy of this sample with alpha and beta discarded.
    pub fn gamma_only(&self) -> Self {
        Self::tilt(self.gamma)
    }

    /// Per-axis difference `self - other`.
    pub fn delta(&self, other: &OrientationSample) -> OrientationSample {
        OrientationSample {
            alpha: self.alpha - other.alpha,
            beta: self.beta - other.beta,
            gamma: self.gamma - other.gamma,
        }
    }

    /// Whether every axis holds a finite number.
    pub fn is_finite(&self) -> bool {
        self.alpha.is_finite() && self.beta.is_finite() && self.gamma.is_finite()
    }
}

/// A sample with its arrival time, as stored in traces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimedSample {
    #[serde(rename = "t")]
    pub timestamp_ns: TimestampNs,

    #[serde(flatten)]
    pub sample: OrientationSample,
}

impl TimedSample {
    pub fn new(timestamp_ns: TimestampNs, sample: OrientationSample) -> Self {
        Self {
            timestamp_ns,
            sample,
        }
    }

    /// Timestamp as fractional seconds since the trace started.
    pub fn timestamp_secs(&self) -> f64 {
        self.timestamp_ns as f64 / 1_000_000_000.0
    }
}
