//! Orientation sample traces.
//!
//! A trace is a JSONL file. The first line is the header, written as a
//! comment (`# {...}`); every following line is one [`TimedSample`].
//! Blank lines and other comment lines are ignored when parsing.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::sample::TimedSample;

/// Current trace schema version.
pub const TRACE_SCHEMA_VERSION: &str = "1.0";

/// Which sensor signals the recording device reported as available.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorCapabilities {
    pub orientation: bool,
    pub acceleration: bool,
    pub acceleration_including_gravity: bool,
    pub rotation_rate: bool,
}

impl SensorCapabilities {
    /// Every signal available.
    pub fn all() -> Self {
        Self {
            orientation: true,
            acceleration: true,
            acceleration_including_gravity: true,
            rotation_rate: true,
        }
    }

    /// Only device orientation available. Assumed for headers that predate
    /// capability reporting.
    pub fn orientation_only() -> Self {
        Self {
            orientation: true,
            acceleration: false,
            acceleration_including_gravity: false,
            rotation_rate: false,
        }
    }

    /// Human-readable names of the missing signals.
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.orientation {
            missing.push("device orientation");
        }
        if !self.acceleration {
            missing.push("device acceleration");
        }
        if !self.acceleration_including_gravity {
            missing.push("device acceleration incl. gravity");
        }
        if !self.rotation_rate {
            missing.push("device rotation rate");
        }
        missing
    }
}

/// Trace metadata, stored as the first line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceHeader {
    /// Schema version for forward compatibility.
    pub schema_version: String,

    /// Wall-clock time at recording start (RFC 3339).
    pub recorded_at: String,

    /// Nominal sample rate of the sensor (Hz).
    pub sample_rate_hz: f64,

    /// Signals the device reported.
    #[serde(default = "SensorCapabilities::orientation_only")]
    pub capabilities: SensorCapabilities,
}

impl TraceHeader {
    /// Header stamped with the current wall-clock time.
    pub fn new(sample_rate_hz: f64, capabilities: SensorCapabilities) -> Self {
        Self {
            schema_version: TRACE_SCHEMA_VERSION.to_string(),
            recorded_at: chrono::Utc::now().to_rfc3339(),
            sample_rate_hz,
            capabilities,
        }
    }
}

/// A parsed trace.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleTrace {
    /// `None` for headerless traces.
    pub header: Option<TraceHeader>,
    pub samples: Vec<TimedSample>,
}

impl SampleTrace {
    /// Capabilities from the header, or orientation-only when absent.
    pub fn capabilities(&self) -> SensorCapabilities {
        self.header
            .as_ref()
            .map(|h| h.capabilities)
            .unwrap_or_else(SensorCapabilities::orientation_only)
    }

    /// Time between the first and last sample, in seconds.
    pub fn duration_secs(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => last.timestamp_secs() - first.timestamp_secs(),
            _ => 0.0,
        }
    }
}

/// Errors that can occur when reading traces.
#[derive(Debug, thiserror::Error)]
pub enum TraceError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error on line {line}: {source}")]
    ParseError {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Invalid trace header: {source}")]
    HeaderError { source: serde_json::Error },

    #[error("Timestamps go backwards on line {line}")]
    NonMonotonic { line: usize },
}

/// Parse samples from JSONL content (one JSON object per line).
pub fn parse_samples(jsonl: &str) -> Result<Vec<TimedSample>, serde_json::Error> {
    jsonl
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(serde_json::from_str)
        .collect()
}

/// Parse a full trace, including its header and a monotonic-time check.
pub fn parse_trace(content: &str) -> Result<SampleTrace, TraceError> {
    let mut header = None;
    let mut samples: Vec<TimedSample> = Vec::new();

    for (idx, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(comment) = line.strip_prefix('#') {
            if header.is_none() && samples.is_empty() {
                let comment = comment.trim();
                if comment.starts_with('{') {
                    header = Some(
                        serde_json::from_str(comment)
                            .map_err(|source| TraceError::HeaderError { source })?,
                    );
                }
            }
            continue;
        }

        let sample: TimedSample = serde_json::from_str(line)
            .map_err(|source| TraceError::ParseError { line: idx + 1, source })?;
        if let Some(prev) = samples.last() {
            if sample.timestamp_ns < prev.timestamp_ns {
                return Err(TraceError::NonMonotonic { line: idx + 1 });
            }
        }
        samples.push(sample);
    }

    Ok(SampleTrace { header, samples })
}

/// Read and parse a trace file.
pub fn load_trace(path: impl AsRef<Path>) -> Result<SampleTrace, TraceError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|source| TraceError::IoError {
        path: path.to_path_buf(),
        source,
    })?;
    parse_trace(&content)
}

/// The header comment line, without a trailing newline.
pub fn header_line(header: &TraceHeader) -> Result<String, serde_json::Error> {
    Ok(format!("# {}", serde_json::to_string(header)?))
}

/// One sample line, without a trailing newline.
pub fn sample_line(sample: &TimedSample) -> Result<String, serde_json::Error> {
    serde_json::to_string(sample)
}

/// Serialize a header line followed by samples in JSONL format.
pub fn serialize_trace(
    header: &TraceHeader,
    samples: &[TimedSample],
) -> Result<String, serde_json::Error> {
    let mut output = header_line(header)?;
    output.push('\n');
    for sample in samples {
        output.push_str(&sample_line(sample)?);
        output.push('\n');
    }
    Ok(output)
}
