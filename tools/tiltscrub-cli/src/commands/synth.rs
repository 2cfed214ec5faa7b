//! Write a synthetic sweep trace.

use std::path::PathBuf;

use anyhow::Context;
use tiltscrub_orientation::{OrientationSource, SweepSource, TraceWriter};
use tiltscrub_sensor_model::TraceHeader;

pub fn run(
    out: PathBuf,
    seconds: f64,
    rate: f64,
    amplitude: f64,
    period: f64,
    jitter: f64,
) -> anyhow::Result<()> {
    let mut source = SweepSource::new(rate, amplitude, period, jitter, seconds)?;
    let header = TraceHeader::new(rate, source.capabilities());

    let mut writer = TraceWriter::create(&out, &header)
        .with_context(|| format!("Failed to create {}", out.display()))?;
    while let Some(sample) = source.poll()? {
        writer.write_sample(&sample)?;
    }
    let written = writer.samples_written();
    writer.finish()?;

    println!(
        "Wrote {written} sample(s) to {} ({seconds}s at {rate}Hz, ±{amplitude}°)",
        out.display()
    );
    Ok(())
}
