//! Orientation-driven scrubbing.
//!
//! Maps left/right tilt onto media time and moves the player there, either
//! with a single jump or by delegating to the [`FrameStepScheduler`].

use serde::{Deserialize, Serialize};
use tiltscrub_common::config::{ScrubConfig, TransitionMode};
use tiltscrub_common::error::TiltscrubResult;
use tiltscrub_sensor_model::OrientationSample;

use crate::engine::{PlaybackEngine, PlayerSignal};
use crate::geometry::{clamp_gamma, gamma_to_time, PlaybackGeometry};
use crate::scheduler::{FrameStepScheduler, ScrubState};

/// Counters describing how change notifications were handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrubStats {
    /// Notifications that produced a jump or a frame walk request.
    pub retargets: u64,
    /// Notifications that landed in the centered deadband.
    pub deadband_holds: u64,
    /// Notifications dropped because the player was not armed yet.
    pub dropped_not_ready: u64,
    /// Notifications dropped because the time mapping was undefined.
    pub dropped_degenerate: u64,
}

/// Consumes orientation changes and drives the player.
pub struct PlaybackScrubController<E: PlaybackEngine> {
    engine: E,
    config: ScrubConfig,
    scheduler: FrameStepScheduler,
    geometry: Option<PlaybackGeometry>,
    engine_ready: bool,
    armed: bool,
    target_time: f64,
    /// Latest jump target waiting for the outstanding seek to land.
    pending_jump: Option<f64>,
    stats: ScrubStats,
}

impl<E: PlaybackEngine> PlaybackScrubController<E> {
    /// Validate `config` and take ownership of `engine`. Not armed yet.
    pub fn new(engine: E, config: ScrubConfig) -> TiltscrubResult<Self> {
        config.validate()?;
        let scheduler = FrameStepScheduler::new(config.fps)?;
        Ok(Self {
            engine,
            config,
            scheduler,
            geometry: None,
            engine_ready: false,
            armed: false,
            target_time: 0.0,
            pending_jump: None,
            stats: ScrubStats::default(),
        })
    }

    /// Dispatch a player signal.
    ///
    /// Returns the freshly derived geometry on `CanPlayThrough`, so the caller
    /// can retune the gamma change threshold.
    pub fn on_signal(&mut self, signal: PlayerSignal) -> Option<PlaybackGeometry> {
        match signal {
            PlayerSignal::Ready => {
                self.on_ready();
                None
            }
            PlayerSignal::CanPlayThrough => self.on_can_play_through(),
            PlayerSignal::PlayStarted => {
                self.on_play_started();
                None
            }
            PlayerSignal::SeekCompleted => {
                self.on_seek_completed();
                None
            }
        }
    }

    /// Record that the player finished initializing.
    pub fn on_ready(&mut self) {
        self.engine_ready = true;
        tracing::debug!(engine = %self.engine.name(), "Player ready");
    }

    /// Capture the media duration and optionally center the player.
    pub fn on_can_play_through(&mut self) -> Option<PlaybackGeometry> {
        let duration = self.engine.duration();
        let Some(geometry) = PlaybackGeometry::from_media(duration, &self.config) else {
            tracing::warn!(duration, "Player reported an unusable duration");
            return None;
        };

        tracing::info!(
            duration,
            frame_count = geometry.frame_count,
            gamma_threshold = geometry.frame_gamma_threshold(),
            "Playback geometry known"
        );

        if self.config.center_on_load {
            let center = duration / 2.0;
            match self.engine.seek(center) {
                Ok(()) => {
                    self.scheduler.track_external_seek();
                    self.target_time = center;
                }
                Err(e) => tracing::warn!(error = %e, "Failed to center player"),
            }
        }

        self.geometry = Some(geometry);
        Some(geometry)
    }

    /// Take ownership of playback: pause and start accepting changes.
    pub fn on_play_started(&mut self) {
        if !self.engine.paused() {
            if let Err(e) = self.engine.pause() {
                tracing::warn!(error = %e, "Failed to pause on play");
            }
        }
        if !self.armed {
            tracing::info!(engine = %self.engine.name(), "Scrub controller armed");
        }
        self.armed = true;
    }

    /// Advance the frame walk, or issue the jump queued behind the seek
    /// that just landed.
    pub fn on_seek_completed(&mut self) {
        self.scheduler.on_seek_completed(&mut self.engine);
        if self.scheduler.seek_in_flight() {
            return;
        }
        if let Some(target_time) = self.pending_jump.take() {
            self.jump(target_time);
        }
    }

    /// Seek straight to `target_time`, or queue it while another seek is
    /// outstanding. A queued target replaces any earlier one.
    fn jump(&mut self, target_time: f64) {
        if self.scheduler.seek_in_flight() {
            self.pending_jump = Some(target_time);
            tracing::trace!(target_time, "Jump queued behind outstanding seek");
            return;
        }
        match self.engine.seek(target_time) {
            Ok(()) => self.scheduler.track_external_seek(),
            Err(e) => tracing::warn!(error = %e, target_time, "Jump seek failed"),
        }
    }

    /// React to a reported orientation change.
    pub fn on_orientation_change(&mut self, orientation: &OrientationSample) {
        if !self.armed {
            self.stats.dropped_not_ready += 1;
            tracing::trace!("Orientation change before player is armed");
            return;
        }

        if !self.engine.paused() {
            if let Err(e) = self.engine.pause() {
                tracing::warn!(error = %e, "Failed to pause before scrubbing");
            }
        }

        let max_gamma = self.config.max_gamma;
        let gamma = clamp_gamma(orientation.gamma, max_gamma);

        if self.config.transition_mode == TransitionMode::Seek
            && gamma.abs() < self.config.stop_threshold
        {
            self.target_time = self.engine.current_time();
            self.scheduler.hold(self.target_time);
            self.stats.deadband_holds += 1;
            return;
        }

        let Some(target_time) = gamma_to_time(gamma, max_gamma, self.engine.duration()) else {
            self.stats.dropped_degenerate += 1;
            tracing::debug!(
                gamma,
                duration = self.engine.duration(),
                "Scrub target undefined"
            );
            return;
        };

        self.target_time = target_time;
        self.stats.retargets += 1;

        match self.config.transition_mode {
            TransitionMode::Jump => self.jump(target_time),
            TransitionMode::Seek => self.scheduler.seek(&mut self.engine, target_time),
        }
    }

    /// Current transient scrub state.
    pub fn scrub_state(&self) -> ScrubState {
        ScrubState {
            target_time: self.target_time,
            ..self.scheduler.state()
        }
    }

    /// Frame walk state machine.
    pub fn scheduler(&self) -> &FrameStepScheduler {
        &self.scheduler
    }

    /// Media geometry, once the player could play through.
    pub fn geometry(&self) -> Option<PlaybackGeometry> {
        self.geometry
    }

    /// Scrub settings in effect.
    pub fn config(&self) -> &ScrubConfig {
        &self.config
    }

    /// Whether playback has started and changes are accepted.
    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Whether the player reported ready.
    pub fn is_engine_ready(&self) -> bool {
        self.engine_ready
    }

    /// Most recent scrub target, in seconds.
    pub fn target_time(&self) -> f64 {
        self.target_time
    }

    /// Counters since creation.
    pub fn stats(&self) -> ScrubStats {
        self.stats
    }

    /// The player being driven.
    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Mutable access to the player, for driving it in tests and replays.
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }
}
