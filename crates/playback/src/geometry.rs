//! Mapping between tilt angle and media time.

use serde::{Deserialize, Serialize};
use tiltscrub_common::config::{ScrubConfig, TransitionMode};

/// Media and scrub parameters, fixed once the player knows the duration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaybackGeometry {
    /// Media duration in seconds.
    pub duration: f64,
    /// Assumed constant frame rate.
    pub fps: f64,
    /// `floor(duration * fps) + 1`.
    pub frame_count: u64,
    /// Gamma clamp bound in degrees.
    pub max_gamma: f64,
    pub transition_mode: TransitionMode,
    pub stop_threshold: f64,
}

impl PlaybackGeometry {
    /// Derive geometry from a known duration. `None` when the duration is
    /// not a positive finite number.
    pub fn from_media(duration: f64, config: &ScrubConfig) -> Option<Self> {
        if !(duration.is_finite() && duration > 0.0) {
            return None;
        }
        Some(Self {
            duration,
            fps: config.fps,
            frame_count: (duration * config.fps).floor() as u64 + 1,
            max_gamma: config.max_gamma,
            transition_mode: config.transition_mode,
            stop_threshold: config.stop_threshold,
        })
    }

    /// Gamma change that corresponds to roughly one frame of travel:
    /// `2 * max_gamma / frame_count`.
    pub fn frame_gamma_threshold(&self) -> f64 {
        2.0 * self.max_gamma / self.frame_count as f64
    }

    /// Length of one frame in seconds.
    pub fn frame_duration(&self) -> f64 {
        1.0 / self.fps
    }
}

/// Clamp gamma to `[-max_gamma, max_gamma]`.
pub fn clamp_gamma(gamma: f64, max_gamma: f64) -> f64 {
    gamma.clamp(-max_gamma, max_gamma)
}

/// Map a gamma angle onto `[0, duration]`, linearly from
/// `[-max_gamma, max_gamma]`. Gamma outside that range is clamped first.
///
/// Returns `None` for degenerate input (non-positive or non-finite
/// `max_gamma` or `duration`, non-finite gamma) instead of a non-finite time.
pub fn gamma_to_time(gamma: f64, max_gamma: f64, duration: f64) -> Option<f64> {
    if !(max_gamma.is_finite() && max_gamma > 0.0) {
        return None;
    }
    if !(duration.is_finite() && duration > 0.0) || !gamma.is_finite() {
        return None;
    }
    let gamma = clamp_gamma(gamma, max_gamma);
    let time = duration * (gamma + max_gamma) / (2.0 * max_gamma);
    Some(time.clamp(0.0, duration))
}
