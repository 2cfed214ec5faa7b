//! Show effective configuration and sensor capabilities.

use std::path::PathBuf;

use anyhow::Context;
use tiltscrub_common::config::{config_file_path, AppConfig};
use tiltscrub_orientation::{log_capabilities, OrientationSource, ReplaySource};

pub fn run(config: &AppConfig, trace: Option<PathBuf>) -> anyhow::Result<()> {
    println!("TiltScrub Check");
    println!("{}", "=".repeat(50));

    let path = config_file_path();
    if path.exists() {
        println!("[OK] Config file: {}", path.display());
    } else {
        println!("[--] Config file: {} (using defaults)", path.display());
    }
    match config.validate() {
        Ok(()) => println!("[OK] Configuration is valid"),
        Err(e) => println!("[ERR] Configuration: {e}"),
    }
    println!();
    println!("{}", serde_json::to_string_pretty(config)?);

    let Some(trace) = trace else {
        return Ok(());
    };

    let source = ReplaySource::open(&trace)
        .with_context(|| format!("Failed to open trace {}", trace.display()))?;
    println!();
    println!("Trace: {} ({} sample(s))", trace.display(), source.remaining());

    let missing = source.capabilities().missing();
    if missing.is_empty() {
        println!("[OK] All sensor signals reported");
    }
    for signal in &missing {
        println!("[WARN] {signal} is not available");
    }
    if !log_capabilities(&source) {
        println!("Orientation is unavailable; this trace cannot drive scrubbing.");
    }

    Ok(())
}
