//! Error types shared across TiltScrub crates.

use std::path::PathBuf;

/// Top-level error type for TiltScrub operations.
#[derive(Debug, thiserror::Error)]
pub enum TiltscrubError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Sensor error: {message}")]
    Sensor { message: String },

    #[error("Playback error: {message}")]
    Playback { message: String },

    #[error("Trace error: {message}")]
    Trace { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using TiltscrubError.
pub type TiltscrubResult<T> = Result<T, TiltscrubError>;

impl TiltscrubError {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn sensor(msg: impl Into<String>) -> Self {
        Self::Sensor {
            message: msg.into(),
        }
    }

    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback {
            message: msg.into(),
        }
    }

    pub fn trace(msg: impl Into<String>) -> Self {
        Self::Trace {
            message: msg.into(),
        }
    }
}
