//! Playback engine contract.
//!
//! The scrub controller never decodes or renders anything itself. It talks to
//! whatever player hosts the media through [`PlaybackEngine`] and reacts to the
//! lifecycle signals that player emits.

use serde::{Deserialize, Serialize};
use tiltscrub_common::error::TiltscrubResult;

/// Trait for the player being scrubbed.
pub trait PlaybackEngine {
    /// Engine name for logging.
    fn name(&self) -> &str;

    /// Current playback position, in seconds.
    fn current_time(&self) -> f64;

    /// Media duration, in seconds. May be zero until metadata is loaded.
    fn duration(&self) -> f64;

    /// Request a seek. Completion is reported later via
    /// [`PlayerSignal::SeekCompleted`].
    fn seek(&mut self, time_secs: f64) -> TiltscrubResult<()>;

    /// Pause playback.
    fn pause(&mut self) -> TiltscrubResult<()>;

    /// Whether playback is paused.
    fn paused(&self) -> bool;
}

/// Lifecycle and progress signals emitted by the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayerSignal {
    /// The player finished initializing.
    Ready,
    /// Enough media is buffered to play to the end; duration is known. Fires once.
    CanPlayThrough,
    /// Playback started. Arms the scrub controller.
    PlayStarted,
    /// The most recently requested seek has landed.
    SeekCompleted,
}
