use std::path::PathBuf;

use tiltscrub_common::config::{AppConfig, FilterKind, TransitionMode};
use tiltscrub_orientation::{OrientationSource, ReplaySource, SweepSource};
use tiltscrub_playback::{PlaybackEngine, PlayerSignal, ScrubSession, SimulatedPlayer};
use tiltscrub_sensor_model::OrientationSample;

const FRAME: f64 = 1.0 / 30.0;

fn fixture_trace(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join("fixtures")
        .join("traces")
        .join(name)
}

fn start(session: &mut ScrubSession<SimulatedPlayer>) {
    session.on_signal(PlayerSignal::Ready);
    session.on_signal(PlayerSignal::CanPlayThrough);
    session.on_signal(PlayerSignal::PlayStarted);
}

fn assert_single_frame_steps(log: &[f64]) {
    for pair in log.windows(2) {
        let step = (pair[1] - pair[0]).abs();
        assert!(
            (step - FRAME).abs() < 1e-9,
            "seek {} -> {} is not one frame",
            pair[0],
            pair[1]
        );
    }
}

#[test]
fn recorded_flick_jumps_through_expected_times() {
    let mut config = AppConfig::default();
    config.orientation.filter_type = FilterKind::None;
    config.scrub.transition_mode = TransitionMode::Jump;
    config.scrub.center_on_load = false;

    let mut source =
        ReplaySource::open(fixture_trace("wrist-flick.jsonl")).expect("fixture trace should load");
    assert!(!source.capabilities().rotation_rate);

    let mut session =
        ScrubSession::new(&config, SimulatedPlayer::new(60.0)).expect("config is valid");
    assert!(session.attach_source(&source));
    start(&mut session);

    let mut consumed = 0;
    while let Some(timed) = source.poll().expect("replay never fails") {
        session.on_sample(&timed.sample);
        session.settle_all_seeks();
        consumed += 1;
    }
    assert_eq!(consumed, 9);

    // alpha and beta jitter is ignored; 12.01 sits under the one-frame threshold
    session.with_scrub(|scrub| {
        assert_eq!(
            scrub.engine().seek_log(),
            &[42.0, 55.0, 60.0, 20.0, 0.0, 0.0]
        );
        assert_eq!(scrub.engine().max_outstanding(), 1);
    });
    assert_eq!(session.orientation().changes_reported(), 6);
}

#[test]
fn jumps_behind_a_slow_player_collapse_to_latest_target() {
    let mut config = AppConfig::default();
    config.orientation.filter_type = FilterKind::None;
    config.scrub.transition_mode = TransitionMode::Jump;
    config.scrub.center_on_load = false;

    let mut source =
        ReplaySource::open(fixture_trace("wrist-flick.jsonl")).expect("fixture trace should load");
    let mut session =
        ScrubSession::new(&config, SimulatedPlayer::new(60.0)).expect("config is valid");
    start(&mut session);

    // nothing lands while the whole trace is delivered
    assert_eq!(session.drain(&mut source).expect("replay never fails"), 9);
    session.with_scrub(|scrub| assert_eq!(scrub.engine().seek_log(), &[42.0]));

    assert_eq!(session.settle_all_seeks(), 2);
    session.with_scrub(|scrub| {
        assert_eq!(scrub.engine().seek_log(), &[42.0, 0.0]);
        assert_eq!(scrub.engine().max_outstanding(), 1);
        assert_eq!(scrub.engine().current_time(), 0.0);
    });
}

#[test]
fn steady_tilt_walks_to_mapped_time() {
    let mut session =
        ScrubSession::new(&AppConfig::default(), SimulatedPlayer::new(60.0)).expect("valid");

    session.on_signal(PlayerSignal::CanPlayThrough);
    let threshold = session.orientation().threshold().gamma;
    assert!((threshold - 60.0 / 1801.0).abs() < 1e-12);
    assert_eq!(session.settle_all_seeks(), 1);
    session.with_engine_mut(|player| assert_eq!(player.current_time(), 30.0));

    session.on_signal(PlayerSignal::PlayStarted);
    for _ in 0..600 {
        session.on_sample(&OrientationSample::tilt(15.0));
        session.settle_one_seek();
    }
    session.settle_all_seeks();

    let state = session.scrub_state();
    assert!(!state.seeking);
    assert!(state.target_time > 44.9 && state.target_time <= 45.0);

    session.with_scrub(|scrub| {
        let player = scrub.engine();
        // the walk stops once one more frame would not bring it closer
        assert!((player.current_time() - 45.0).abs() < 0.15);
        assert!((player.current_time() - state.target_time).abs() < 2.0 * FRAME);
        assert_eq!(player.max_outstanding(), 1);
        assert_eq!(player.seek_log()[0], 30.0);
        assert_single_frame_steps(player.seek_log());
    });

    let stats = session.stats();
    assert!(stats.deadband_holds > 0, "early filtered samples stay under 5 degrees");
    assert!(stats.retargets > 0);
}

#[test]
fn slow_player_never_has_two_seeks_outstanding() {
    let mut session =
        ScrubSession::new(&AppConfig::default(), SimulatedPlayer::new(60.0)).expect("valid");
    start(&mut session);

    let mut source = SweepSource::new(60.0, 30.0, 4.0, 0.5, 8.0).expect("valid sweep");
    let mut polled = 0u64;
    while let Some(timed) = source.poll().expect("sweep never fails") {
        session.on_sample(&timed.sample);
        polled += 1;
        if polled % 3 == 0 {
            session.settle_one_seek();
        }
    }
    session.settle_all_seeks();
    assert_eq!(polled, 480);

    session.with_scrub(|scrub| {
        let player = scrub.engine();
        assert_eq!(player.max_outstanding(), 1);
        assert_eq!(player.outstanding(), 0);
        assert!(player
            .seek_log()
            .iter()
            .all(|t| (0.0..=60.0).contains(t)));
        assert_single_frame_steps(player.seek_log());
    });

    let stats = session.stats();
    assert!(stats.retargets > 0);
    assert!(stats.deadband_holds > 0);
    assert_eq!(stats.dropped_not_ready, 0);
}

#[test]
fn changes_before_play_are_dropped() {
    let mut session =
        ScrubSession::new(&AppConfig::default(), SimulatedPlayer::new(60.0)).expect("valid");
    session.on_signal(PlayerSignal::CanPlayThrough);
    session.settle_all_seeks();

    for _ in 0..20 {
        session.on_sample(&OrientationSample::tilt(25.0));
    }
    assert!(session.stats().dropped_not_ready > 0);
    session.with_scrub(|scrub| assert_eq!(scrub.engine().seek_log(), &[30.0]));
}
