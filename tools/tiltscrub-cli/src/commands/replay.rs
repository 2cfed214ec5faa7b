//! Replay a recorded trace against a simulated player.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tiltscrub_common::config::AppConfig;
use tiltscrub_orientation::{OrientationSource, ReplaySource};
use tiltscrub_playback::{PlaybackEngine, PlayerSignal, ScrubSession, SimulatedPlayer};

pub struct ReplayOptions {
    pub duration: f64,
    pub latency_samples: u32,
    pub realtime: bool,
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ReplaySummary {
    samples: u64,
    changes_reported: u64,
    seeks_issued: usize,
    max_outstanding: usize,
    final_time: f64,
    target_time: f64,
    retargets: u64,
    deadband_holds: u64,
    dropped_not_ready: u64,
    dropped_degenerate: u64,
}

pub async fn run(trace: PathBuf, config: AppConfig, options: ReplayOptions) -> anyhow::Result<()> {
    let mut source = ReplaySource::open(&trace)
        .with_context(|| format!("Failed to open trace {}", trace.display()))?;

    let mut session = ScrubSession::new(&config, SimulatedPlayer::new(options.duration))
        .context("Invalid scrub configuration")?;
    session.attach_source(&source);

    session.on_signal(PlayerSignal::Ready);
    session.on_signal(PlayerSignal::CanPlayThrough);
    session.settle_all_seeks();
    session.on_signal(PlayerSignal::PlayStarted);

    tracing::info!(
        trace = %trace.display(),
        samples = source.remaining(),
        latency = options.latency_samples,
        realtime = options.realtime,
        "Replaying trace"
    );

    let mut samples = 0u64;
    let mut last_timestamp = None;
    while let Some(timed) = source.poll()? {
        if options.realtime {
            if let Some(last) = last_timestamp {
                let gap = timed.timestamp_ns.saturating_sub(last);
                tokio::time::sleep(Duration::from_nanos(gap)).await;
            }
            last_timestamp = Some(timed.timestamp_ns);
        }

        session.on_sample(&timed.sample);
        samples += 1;

        if options.latency_samples == 0 {
            session.settle_all_seeks();
        } else if samples % u64::from(options.latency_samples) == 0 {
            session.settle_one_seek();
        }
    }
    session.settle_all_seeks();

    let stats = session.stats();
    let summary = session.with_scrub(|scrub| ReplaySummary {
        samples,
        changes_reported: session.orientation().changes_reported(),
        seeks_issued: scrub.engine().seek_log().len(),
        max_outstanding: scrub.engine().max_outstanding(),
        final_time: scrub.engine().current_time(),
        target_time: scrub.target_time(),
        retargets: stats.retargets,
        deadband_holds: stats.deadband_holds,
        dropped_not_ready: stats.dropped_not_ready,
        dropped_degenerate: stats.dropped_degenerate,
    });

    if options.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Replayed {} sample(s) from {}", summary.samples, trace.display());
    println!(
        "  Mode: {} / filter {}",
        config.scrub.transition_mode, config.orientation.filter_type
    );
    println!("  Changes reported: {}", summary.changes_reported);
    println!(
        "  Seeks issued: {} (max outstanding {})",
        summary.seeks_issued, summary.max_outstanding
    );
    println!(
        "  Final position: {:.3}s (target {:.3}s of {:.3}s)",
        summary.final_time, summary.target_time, options.duration
    );
    println!(
        "  Retargets: {}, deadband holds: {}",
        summary.retargets, summary.deadband_holds
    );
    if summary.dropped_degenerate > 0 {
        println!(
            "  {} change(s) dropped: media timing unusable",
            summary.dropped_degenerate
        );
    }

    Ok(())
}
