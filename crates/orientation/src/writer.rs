//! Streaming trace recorder.
//!
//! Produces the same JSONL layout as [`serialize_trace`], one sample at a
//! time, and refuses samples whose timestamp goes backwards so every trace it
//! writes loads again with [`parse_trace`].
//!
//! [`serialize_trace`]: tiltscrub_sensor_model::serialize_trace
//! [`parse_trace`]: tiltscrub_sensor_model::parse_trace

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use tiltscrub_common::error::{TiltscrubError, TiltscrubResult};
use tiltscrub_sensor_model::{header_line, sample_line, TimedSample, TimestampNs, TraceHeader};

/// Records timed samples into any byte sink.
pub struct TraceWriter<W: Write = BufWriter<File>> {
    out: W,
    samples_written: u64,
    last_timestamp: Option<TimestampNs>,
}

impl TraceWriter<BufWriter<File>> {
    /// Create (or truncate) a trace file, creating parent directories.
    pub fn create(path: impl AsRef<Path>, header: &TraceHeader) -> TiltscrubResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let writer = Self::new(BufWriter::new(File::create(path)?), header)?;
        tracing::debug!(
            path = %path.display(),
            rate = header.sample_rate_hz,
            "Trace recording started"
        );
        Ok(writer)
    }
}

impl<W: Write> TraceWriter<W> {
    /// Start a trace on `out` by writing its header line.
    pub fn new(mut out: W, header: &TraceHeader) -> TiltscrubResult<Self> {
        writeln!(out, "{}", header_line(header)?)?;
        Ok(Self {
            out,
            samples_written: 0,
            last_timestamp: None,
        })
    }

    /// Append one sample. Timestamps may repeat but never decrease.
    pub fn write_sample(&mut self, sample: &TimedSample) -> TiltscrubResult<()> {
        if let Some(last) = self.last_timestamp {
            if sample.timestamp_ns < last {
                return Err(TiltscrubError::trace(format!(
                    "sample at {}ns follows {}ns",
                    sample.timestamp_ns, last
                )));
            }
        }
        writeln!(self.out, "{}", sample_line(sample)?)?;
        self.last_timestamp = Some(sample.timestamp_ns);
        self.samples_written += 1;
        Ok(())
    }

    /// Number of samples written.
    pub fn samples_written(&self) -> u64 {
        self.samples_written
    }

    /// Flush and hand back the sink.
    pub fn finish(mut self) -> TiltscrubResult<W> {
        self.out.flush()?;
        tracing::debug!(samples = self.samples_written, "Trace recording finished");
        Ok(self.out)
    }
}
