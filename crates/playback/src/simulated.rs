//! In-memory player with deferred seek completion.
//!
//! Seeks are queued instead of applied; the caller decides when each one
//! lands by calling [`SimulatedPlayer::complete_seek`], which lets tests and
//! the replay tool model arbitrary engine latency.

use std::collections::VecDeque;

use tiltscrub_common::error::{TiltscrubError, TiltscrubResult};

use crate::engine::{PlaybackEngine, PlayerSignal};
use crate::session::ScrubSession;

/// A player that records every request.
#[derive(Debug, Clone)]
pub struct SimulatedPlayer {
    duration: f64,
    current_time: f64,
    paused: bool,
    pending: VecDeque<f64>,
    seek_log: Vec<f64>,
    max_outstanding: usize,
    pause_calls: u64,
    reject_seeks: bool,
}

impl SimulatedPlayer {
    /// A paused player at time zero.
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            current_time: 0.0,
            paused: true,
            pending: VecDeque::new(),
            seek_log: Vec::new(),
            max_outstanding: 0,
            pause_calls: 0,
            reject_seeks: false,
        }
    }

    /// Start the player at a given position, bypassing the seek queue.
    pub fn at(mut self, time_secs: f64) -> Self {
        self.current_time = time_secs;
        self
    }

    /// Resume playback.
    pub fn play(&mut self) {
        self.paused = false;
    }

    /// Make subsequent seeks fail.
    pub fn reject_seeks(&mut self, reject: bool) {
        self.reject_seeks = reject;
    }

    /// Land the oldest outstanding seek. Returns `false` if none was pending.
    pub fn complete_seek(&mut self) -> bool {
        match self.pending.pop_front() {
            Some(time) => {
                self.current_time = time;
                true
            }
            None => false,
        }
    }

    /// Seeks requested but not yet landed.
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Highest number of simultaneously outstanding seeks seen.
    pub fn max_outstanding(&self) -> usize {
        self.max_outstanding
    }

    /// Every seek target requested, in order.
    pub fn seek_log(&self) -> &[f64] {
        &self.seek_log
    }

    /// Number of pause requests received.
    pub fn pause_calls(&self) -> u64 {
        self.pause_calls
    }
}

impl PlaybackEngine for SimulatedPlayer {
    fn name(&self) -> &str {
        "simulated"
    }

    fn current_time(&self) -> f64 {
        self.current_time
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn seek(&mut self, time_secs: f64) -> TiltscrubResult<()> {
        if self.reject_seeks {
            return Err(TiltscrubError::playback("seek rejected by player"));
        }
        if !time_secs.is_finite() || time_secs < 0.0 || time_secs > self.duration {
            return Err(TiltscrubError::playback(format!(
                "seek target {time_secs} outside [0, {}]",
                self.duration
            )));
        }
        self.seek_log.push(time_secs);
        self.pending.push_back(time_secs);
        self.max_outstanding = self.max_outstanding.max(self.pending.len());
        Ok(())
    }

    fn pause(&mut self) -> TiltscrubResult<()> {
        self.pause_calls += 1;
        self.paused = true;
        Ok(())
    }

    fn paused(&self) -> bool {
        self.paused
    }
}

impl ScrubSession<SimulatedPlayer> {
    /// Land one outstanding seek and deliver its completion signal.
    pub fn settle_one_seek(&mut self) -> bool {
        let landed = self.with_engine_mut(SimulatedPlayer::complete_seek);
        if landed {
            self.on_signal(PlayerSignal::SeekCompleted);
        }
        landed
    }

    /// Keep landing seeks until the player has none outstanding.
    /// Returns how many landed.
    pub fn settle_all_seeks(&mut self) -> u64 {
        let mut landed = 0;
        while self.settle_one_seek() {
            landed += 1;
        }
        landed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeks_land_in_order() {
        let mut player = SimulatedPlayer::new(10.0);
        player.seek(2.0).unwrap();
        player.seek(3.0).unwrap();
        assert_eq!(player.outstanding(), 2);
        assert_eq!(player.max_outstanding(), 2);
        assert_eq!(player.current_time(), 0.0);

        assert!(player.complete_seek());
        assert_eq!(player.current_time(), 2.0);
        assert!(player.complete_seek());
        assert_eq!(player.current_time(), 3.0);
        assert!(!player.complete_seek());
    }

    #[test]
    fn test_out_of_range_seek_fails() {
        let mut player = SimulatedPlayer::new(10.0);
        assert!(player.seek(-0.1).is_err());
        assert!(player.seek(10.5).is_err());
        assert!(player.seek(f64::NAN).is_err());
        assert!(player.seek_log().is_empty());
    }

    #[test]
    fn test_pause() {
        let mut player = SimulatedPlayer::new(10.0);
        player.play();
        assert!(!player.paused());
        player.pause().unwrap();
        assert!(player.paused());
        assert_eq!(player.pause_calls(), 1);
    }
}
