//! TiltScrub CLI: replay, synthesize, and inspect orientation traces.
//!
//! Usage:
//!   tiltscrub replay <TRACE>   Scrub a simulated player with a recorded trace
//!   tiltscrub synth <OUT>      Write a synthetic tilt sweep trace
//!   tiltscrub check [TRACE]    Show the effective config and sensor capabilities

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tiltscrub_common::config::{AppConfig, FilterKind, TransitionMode};

mod commands;

#[derive(Parser)]
#[command(
    name = "tiltscrub",
    about = "Scrub video playback by tilting the device",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file (defaults to the standard location)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a trace through the scrub pipeline against a simulated player
    Replay {
        /// Path to the JSONL trace
        trace: PathBuf,

        /// Media duration of the simulated player (seconds)
        #[arg(long, default_value = "60.0")]
        duration: f64,

        /// Media frame rate (overrides config)
        #[arg(long)]
        fps: Option<f64>,

        /// Transition mode: jump|seek (overrides config)
        #[arg(long)]
        mode: Option<TransitionMode>,

        /// Smoothing filter: none|low_pass (overrides config)
        #[arg(long)]
        filter: Option<FilterKind>,

        /// Samples delivered between seek completions (0 = seeks land instantly)
        #[arg(long, default_value = "1")]
        latency_samples: u32,

        /// Pace samples by their recorded timestamps
        #[arg(long)]
        realtime: bool,

        /// Print the summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write a synthetic left/right sweep trace
    Synth {
        /// Output trace path
        out: PathBuf,

        /// Trace length (seconds)
        #[arg(long, default_value = "10.0")]
        seconds: f64,

        /// Sample rate (Hz)
        #[arg(long, default_value = "60.0")]
        rate: f64,

        /// Peak gamma (degrees)
        #[arg(long, default_value = "30.0")]
        amplitude: f64,

        /// Sweep period (seconds)
        #[arg(long, default_value = "4.0")]
        period: f64,

        /// Alternating noise added to gamma (degrees)
        #[arg(long, default_value = "0.5")]
        jitter: f64,
    },

    /// Show the effective configuration and, optionally, a trace's capabilities
    Check {
        /// Trace to inspect
        trace: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => AppConfig::load(),
    };

    tiltscrub_common::logging::init_cli_logging(&config.logging, cli.verbose);

    match cli.command {
        Commands::Replay {
            trace,
            duration,
            fps,
            mode,
            filter,
            latency_samples,
            realtime,
            json,
        } => {
            let mut config = config;
            if let Some(fps) = fps {
                config.scrub.fps = fps;
            }
            if let Some(mode) = mode {
                config.scrub.transition_mode = mode;
            }
            if let Some(filter) = filter {
                config.orientation.filter_type = filter;
            }
            commands::replay::run(
                trace,
                config,
                commands::replay::ReplayOptions {
                    duration,
                    latency_samples,
                    realtime,
                    json,
                },
            )
            .await
        }
        Commands::Synth {
            out,
            seconds,
            rate,
            amplitude,
            period,
            jitter,
        } => commands::synth::run(out, seconds, rate, amplitude, period, jitter),
        Commands::Check { trace } => commands::check::run(&config, trace),
    }
}
