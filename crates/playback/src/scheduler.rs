//! Frame-by-frame seek sequencing.
//!
//! A continuous scrub is walked one frame at a time: each step is a single
//! engine seek, and the next step is only issued once the engine confirms the
//! previous one landed. At most one engine seek is outstanding at any time.
//!
//! ```text
//!            seek(target)                 SeekCompleted, step fits
//!   ┌──────┐ ───────────▶ ┌─────────┐ ◀──────────────────────────┐
//!   │ Idle │              │ Seeking │ ───────────────────────────┘
//!   └──────┘ ◀─────────── └─────────┘
//!        step overshoots, leaves [0, duration], or hold()
//! ```

use serde::{Deserialize, Serialize};
use tiltscrub_common::error::{TiltscrubError, TiltscrubResult};

use crate::engine::PlaybackEngine;

/// Slack when comparing the remaining distance to one frame, so that a
/// target sitting exactly on a frame boundary behaves the same regardless of
/// floating-point rounding.
const STEP_TOLERANCE: f64 = 1e-9;

/// Scheduler phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepPhase {
    Idle,
    Seeking,
}

/// Snapshot of the transient scrub state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrubState {
    pub seeking: bool,
    pub target_time: f64,
    pub step_increment: f64,
}

/// Incremental seek state machine.
#[derive(Debug, Clone)]
pub struct FrameStepScheduler {
    phase: StepPhase,
    target_time: f64,
    step_increment: f64,
    frame_duration: f64,
    seek_in_flight: bool,
    frames_stepped: u64,
}

impl FrameStepScheduler {
    /// Idle scheduler stepping `1/fps` seconds at a time.
    pub fn new(fps: f64) -> TiltscrubResult<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            return Err(TiltscrubError::config(format!(
                "fps must be positive, got {fps}"
            )));
        }
        Ok(Self {
            phase: StepPhase::Idle,
            target_time: 0.0,
            step_increment: 0.0,
            frame_duration: 1.0 / fps,
            seek_in_flight: false,
            frames_stepped: 0,
        })
    }

    /// Start walking toward `target_time`, or retarget the walk in progress.
    ///
    /// The target is clamped to `[0, duration]`. From `Idle` the first step
    /// is evaluated immediately unless an engine seek is still outstanding,
    /// in which case it waits for that completion. While `Seeking` only the
    /// target and direction change; no extra seek is issued.
    pub fn seek<E: PlaybackEngine + ?Sized>(&mut self, engine: &mut E, target_time: f64) {
        let duration = engine.duration();
        if !(duration.is_finite() && duration > 0.0) || !target_time.is_finite() {
            tracing::debug!(duration, target_time, "Ignoring seek with degenerate timing");
            return;
        }

        self.target_time = target_time.clamp(0.0, duration);
        self.step_increment = self.direction_to_target(engine.current_time());

        match self.phase {
            StepPhase::Idle => {
                self.phase = StepPhase::Seeking;
                tracing::debug!(
                    target = self.target_time,
                    step = self.step_increment,
                    "Frame stepping started"
                );
                if !self.seek_in_flight {
                    self.advance(engine);
                }
            }
            StepPhase::Seeking => {
                tracing::trace!(
                    target = self.target_time,
                    step = self.step_increment,
                    "Frame stepping retargeted"
                );
            }
        }
    }

    /// Handle the engine's seek-completion signal.
    pub fn on_seek_completed<E: PlaybackEngine + ?Sized>(&mut self, engine: &mut E) {
        self.seek_in_flight = false;
        if self.phase != StepPhase::Seeking {
            return;
        }
        // Re-derive direction from where the engine actually landed so that a
        // retarget issued mid-flight still walks toward the new target.
        self.step_increment = self.direction_to_target(engine.current_time());
        self.advance(engine);
    }

    /// Stop at `current_time` without issuing a seek.
    pub fn hold(&mut self, current_time: f64) {
        self.target_time = current_time;
        self.step_increment = 0.0;
        if self.phase == StepPhase::Seeking {
            tracing::debug!(position = current_time, "Frame stepping held");
        }
        self.phase = StepPhase::Idle;
    }

    /// Record a seek issued outside the frame walk (a jump, or centering
    /// the player), so its completion is not mistaken for a free slot.
    pub fn track_external_seek(&mut self) {
        self.seek_in_flight = true;
    }

    /// Snapshot of phase, target and step.
    pub fn state(&self) -> ScrubState {
        ScrubState {
            seeking: self.is_seeking(),
            target_time: self.target_time,
            step_increment: self.step_increment,
        }
    }

    /// Current phase.
    pub fn phase(&self) -> StepPhase {
        self.phase
    }

    /// Whether a frame walk is in progress.
    pub fn is_seeking(&self) -> bool {
        self.phase == StepPhase::Seeking
    }

    /// Whether an engine seek is awaiting completion.
    pub fn seek_in_flight(&self) -> bool {
        self.seek_in_flight
    }

    /// Single-frame seeks issued since creation.
    pub fn frames_stepped(&self) -> u64 {
        self.frames_stepped
    }

    /// `±1/fps` toward the target, or zero when already on it.
    fn direction_to_target(&self, current_time: f64) -> f64 {
        if self.target_time > current_time {
            self.frame_duration
        } else if self.target_time < current_time {
            -self.frame_duration
        } else {
            0.0
        }
    }

    /// Issue the next single-frame seek, or go idle if it would not help.
    fn advance<E: PlaybackEngine + ?Sized>(&mut self, engine: &mut E) {
        let current = engine.current_time();
        let duration = engine.duration();
        let step = self.step_increment;
        let next = current + step;

        let fits = step != 0.0
            && (next - self.target_time).abs() >= step.abs() - STEP_TOLERANCE
            && next >= 0.0
            && next <= duration;

        if !fits {
            self.phase = StepPhase::Idle;
            tracing::debug!(
                position = current,
                target = self.target_time,
                "Frame stepping finished"
            );
            return;
        }

        match engine.seek(next) {
            Ok(()) => {
                self.seek_in_flight = true;
                self.frames_stepped += 1;
            }
            Err(e) => {
                tracing::warn!(engine = %engine.name(), error = %e, "Frame step seek failed");
                self.phase = StepPhase::Idle;
            }
        }
    }
}
