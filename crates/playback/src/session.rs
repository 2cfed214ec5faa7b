//! Scrub session wiring.
//!
//! Owns the orientation pipeline and the scrub controller for one player and
//! routes the two external event streams into them: orientation samples and
//! player signals. The orientation listener is a closure holding its own
//! handle to the scrub controller, so change notifications always reach this
//! session's player.

use std::cell::RefCell;
use std::rc::Rc;

use tiltscrub_common::config::AppConfig;
use tiltscrub_common::error::TiltscrubResult;
use tiltscrub_orientation::{log_capabilities, OrientationController, OrientationSource};
use tiltscrub_sensor_model::OrientationSample;

use crate::engine::{PlaybackEngine, PlayerSignal};
use crate::scheduler::ScrubState;
use crate::scrub::{PlaybackScrubController, ScrubStats};

/// One orientation-driven player.
pub struct ScrubSession<E: PlaybackEngine> {
    orientation: OrientationController,
    scrub: Rc<RefCell<PlaybackScrubController<E>>>,
    gamma_only: bool,
}

impl<E: PlaybackEngine + 'static> ScrubSession<E> {
    /// Validate `config` and wire a session around `engine`.
    pub fn new(config: &AppConfig, engine: E) -> TiltscrubResult<Self> {
        config.validate()?;

        let scrub = Rc::new(RefCell::new(PlaybackScrubController::new(
            engine,
            config.scrub.clone(),
        )?));

        let mut orientation = OrientationController::from_config(&config.orientation)?;
        let target = Rc::clone(&scrub);
        orientation.set_listener(move |o: &OrientationSample| {
            target.borrow_mut().on_orientation_change(o)
        });

        tracing::info!(
            filter = %config.orientation.filter_type,
            mode = %config.scrub.transition_mode,
            max_gamma = config.scrub.max_gamma,
            fps = config.scrub.fps,
            "Scrub session created"
        );

        Ok(Self {
            orientation,
            scrub,
            gamma_only: config.orientation.gamma_only,
        })
    }

    /// Feed one raw sample. Returns whether a change was reported.
    pub fn on_sample(&mut self, raw: &OrientationSample) -> bool {
        let raw = if self.gamma_only {
            raw.gamma_only()
        } else {
            *raw
        };
        self.orientation.on_sample(&raw).is_some()
    }

    /// Feed one player signal.
    pub fn on_signal(&mut self, signal: PlayerSignal) {
        let geometry = self.scrub.borrow_mut().on_signal(signal);
        if let Some(geometry) = geometry {
            let gamma = geometry.frame_gamma_threshold();
            if let Err(e) = self.orientation.set_gamma_threshold(gamma) {
                tracing::warn!(error = %e, "Keeping configured gamma threshold");
            }
        }
    }

    /// Pull every currently available sample from `source`.
    /// Returns the number of samples consumed.
    pub fn drain(&mut self, source: &mut dyn OrientationSource) -> TiltscrubResult<u64> {
        let mut consumed = 0;
        while let Some(timed) = source.poll()? {
            self.on_sample(&timed.sample);
            consumed += 1;
        }
        Ok(consumed)
    }

    /// Log the source's capabilities. Missing signals are warnings only.
    pub fn attach_source(&self, source: &dyn OrientationSource) -> bool {
        log_capabilities(source)
    }

    /// The filter and change-detection stage.
    pub fn orientation(&self) -> &OrientationController {
        &self.orientation
    }

    /// Transient scrub state of the player.
    pub fn scrub_state(&self) -> ScrubState {
        self.scrub.borrow().scrub_state()
    }

    /// Scrub counters since creation.
    pub fn stats(&self) -> ScrubStats {
        self.scrub.borrow().stats()
    }

    /// Run `f` with shared access to the scrub controller.
    pub fn with_scrub<R>(&self, f: impl FnOnce(&PlaybackScrubController<E>) -> R) -> R {
        f(&self.scrub.borrow())
    }

    /// Run `f` with mutable access to the player.
    pub fn with_engine_mut<R>(&self, f: impl FnOnce(&mut E) -> R) -> R {
        f(self.scrub.borrow_mut().engine_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulated::SimulatedPlayer;
    use tiltscrub_common::config::{FilterKind, TransitionMode};
    use tiltscrub_orientation::SweepSource;

    fn passthrough_config(mode: TransitionMode) -> AppConfig {
        let mut config = AppConfig::default();
        config.orientation.filter_type = FilterKind::None;
        config.scrub.transition_mode = mode;
        config.scrub.center_on_load = false;
        config
    }

    #[test]
    fn test_changes_reach_player_only_after_play() {
        let mut session =
            ScrubSession::new(&passthrough_config(TransitionMode::Jump), SimulatedPlayer::new(60.0))
                .unwrap();

        assert!(session.on_sample(&OrientationSample::tilt(30.0)));
        session.with_scrub(|s| assert!(s.engine().seek_log().is_empty()));

        session.on_signal(PlayerSignal::PlayStarted);
        assert!(session.on_sample(&OrientationSample::tilt(-30.0)));
        session.with_scrub(|s| assert_eq!(s.engine().seek_log(), &[0.0]));
        assert_eq!(session.stats().dropped_not_ready, 1);
    }

    #[test]
    fn test_can_play_through_retunes_gamma_threshold() {
        let mut session =
            ScrubSession::new(&passthrough_config(TransitionMode::Seek), SimulatedPlayer::new(60.0))
                .unwrap();
        assert_eq!(session.orientation().threshold().gamma, 1.0);

        session.on_signal(PlayerSignal::CanPlayThrough);
        let gamma = session.orientation().threshold().gamma;
        assert!((gamma - 60.0 / 1801.0).abs() < 1e-12);
        assert_eq!(session.orientation().threshold().alpha, 1.0);
    }

    #[test]
    fn test_gamma_only_ignores_other_axes() {
        let mut session =
            ScrubSession::new(&passthrough_config(TransitionMode::Jump), SimulatedPlayer::new(60.0))
                .unwrap();
        assert!(!session.on_sample(&OrientationSample::new(90.0, 45.0, 0.5)));

        let mut config = passthrough_config(TransitionMode::Jump);
        config.orientation.gamma_only = false;
        let mut session = ScrubSession::new(&config, SimulatedPlayer::new(60.0)).unwrap();
        assert!(session.on_sample(&OrientationSample::new(90.0, 45.0, 0.5)));
    }

    #[test]
    fn test_drain_consumes_source() {
        let mut session =
            ScrubSession::new(&passthrough_config(TransitionMode::Seek), SimulatedPlayer::new(60.0))
                .unwrap();
        let mut source = SweepSource::new(60.0, 30.0, 2.0, 0.0, 1.0).unwrap();
        assert!(session.attach_source(&source));
        assert_eq!(session.drain(&mut source).unwrap(), 60);
        assert_eq!(session.orientation().samples_seen(), 60);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = AppConfig::default();
        config.orientation.threshold.gamma = -1.0;
        assert!(ScrubSession::new(&config, SimulatedPlayer::new(60.0)).is_err());
    }
}
