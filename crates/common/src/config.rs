//! Application configuration.
//!
//! Every recognized option lives in a named field with a documented default.
//! Partial config files are accepted: missing fields take their defaults, and
//! the merged result is checked once by [`AppConfig::validate`].

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{TiltscrubError, TiltscrubResult};

/// Global application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Orientation smoothing and change detection.
    pub orientation: OrientationConfig,

    /// Playback scrubbing.
    pub scrub: ScrubConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Smoothing filter applied to raw orientation samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    /// No smoothing; the latest sample is the estimate.
    None,
    /// Single-pole low-pass (exponential smoothing).
    #[default]
    #[serde(alias = "lpf", alias = "lpf2")]
    LowPass,
}

/// How an accepted orientation change reaches its playback target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TransitionMode {
    /// One seek straight to the target time.
    Jump,
    /// Frame-by-frame seeks, each gated on the previous completion.
    #[default]
    Seek,
}

/// Per-axis minimum delta (degrees) before a change is reported.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

/// Orientation pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrientationConfig {
    /// Filter kind.
    pub filter_type: FilterKind,

    /// Weight of the newest sample for the low-pass filter, in (0, 1).
    pub coefficient: f64,

    /// Per-axis change thresholds.
    pub threshold: ThresholdConfig,

    /// Zero alpha and beta before filtering, so only tilt drives changes.
    pub gamma_only: bool,
}

/// Playback scrubbing settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrubConfig {
    /// Clamp bound for gamma, in degrees. Maps onto the full media duration.
    pub max_gamma: f64,

    /// Jump or frame-stepped seek.
    pub transition_mode: TransitionMode,

    /// Seek mode only: `|gamma|` below this holds the current position.
    pub stop_threshold: f64,

    /// Assumed constant frame rate of the media.
    pub fps: f64,

    /// Move the player to the middle of the media once it can play through.
    pub center_on_load: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "tiltscrub_playback=trace,warn").
    pub level: String,

    /// Whether to output structured JSON logs.
    pub json: bool,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self::uniform(1.0)
    }
}

impl ThresholdConfig {
    /// Same threshold on every axis.
    pub fn uniform(degrees: f64) -> Self {
        Self {
            alpha: degrees,
            beta: degrees,
            gamma: degrees,
        }
    }

    /// Check that every axis threshold is finite and strictly positive.
    pub fn validate(&self) -> TiltscrubResult<()> {
        for (axis, value) in [
            ("alpha", self.alpha),
            ("beta", self.beta),
            ("gamma", self.gamma),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TiltscrubError::config(format!(
                    "threshold.{axis} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self {
            filter_type: FilterKind::LowPass,
            coefficient: 0.1,
            threshold: ThresholdConfig::default(),
            gamma_only: true,
        }
    }
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            max_gamma: 30.0,
            transition_mode: TransitionMode::Seek,
            stop_threshold: 5.0,
            fps: 30.0,
            center_on_load: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl OrientationConfig {
    pub fn validate(&self) -> TiltscrubResult<()> {
        validate_coefficient(self.filter_type, self.coefficient)?;
        self.threshold.validate()
    }
}

impl ScrubConfig {
    pub fn validate(&self) -> TiltscrubResult<()> {
        if !(self.max_gamma.is_finite() && self.max_gamma > 0.0) {
            return Err(TiltscrubError::config(format!(
                "max_gamma must be positive, got {}",
                self.max_gamma
            )));
        }
        if !(self.fps.is_finite() && self.fps > 0.0) {
            return Err(TiltscrubError::config(format!(
                "fps must be positive, got {}",
                self.fps
            )));
        }
        if !(self.stop_threshold.is_finite() && self.stop_threshold >= 0.0) {
            return Err(TiltscrubError::config(format!(
                "stop_threshold must be non-negative, got {}",
                self.stop_threshold
            )));
        }
        Ok(())
    }
}

/// The low-pass coefficient must lie strictly inside (0, 1).
/// Passthrough ignores it.
pub fn validate_coefficient(kind: FilterKind, coefficient: f64) -> TiltscrubResult<()> {
    if kind == FilterKind::LowPass && !(coefficient > 0.0 && coefficient < 1.0) {
        return Err(TiltscrubError::config(format!(
            "coefficient must be in (0, 1) for the low-pass filter, got {coefficient}"
        )));
    }
    Ok(())
}

impl AppConfig {
    /// Load config from the standard location, falling back to defaults.
    pub fn load() -> Self {
        let config_path = config_file_path();
        if config_path.exists() {
            match Self::load_from(&config_path) {
                Ok(config) => return config,
                Err(e) => {
                    tracing::warn!("Failed to load config at {:?}: {}", config_path, e);
                }
            }
        }
        Self::default()
    }

    /// Load and validate config from an explicit path.
    pub fn load_from(path: &Path) -> TiltscrubResult<Self> {
        if !path.exists() {
            return Err(TiltscrubError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the pipeline relies on.
    pub fn validate(&self) -> TiltscrubResult<()> {
        self.orientation.validate()?;
        self.scrub.validate()
    }

    /// Save config to the standard location.
    pub fn save(&self) -> Result<(), std::io::Error> {
        let config_path = config_file_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::other)?;
        std::fs::write(config_path, json)
    }
}

/// Standard config file location.
pub fn config_file_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| "/tmp".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("tiltscrub").join("config.json")
}

impl FromStr for FilterKind {
    type Err = TiltscrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(Self::None),
            "low_pass" | "lowpass" | "lpf" | "lpf2" => Ok(Self::LowPass),
            other => Err(TiltscrubError::config(format!(
                "unknown filter type '{other}' (expected none|low_pass)"
            ))),
        }
    }
}

impl fmt::Display for FilterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("none"),
            Self::LowPass => f.write_str("low_pass"),
        }
    }
}

impl FromStr for TransitionMode {
    type Err = TiltscrubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "jump" => Ok(Self::Jump),
            "seek" => Ok(Self::Seek),
            other => Err(TiltscrubError::config(format!(
                "unknown transition mode '{other}' (expected jump|seek)"
            ))),
        }
    }
}

impl fmt::Display for TransitionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Jump => f.write_str("jump"),
            Self::Seek => f.write_str("seek"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        config.validate().unwrap();
        assert_eq!(config.orientation.filter_type, FilterKind::LowPass);
        assert_eq!(config.scrub.transition_mode, TransitionMode::Seek);
        assert_eq!(config.scrub.max_gamma, 30.0);
        assert_eq!(config.scrub.fps, 30.0);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let raw = r#"{ "scrub": { "transition_mode": "jump" } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.scrub.transition_mode, TransitionMode::Jump);
        assert_eq!(config.scrub.stop_threshold, 5.0);
        assert_eq!(config.orientation.threshold, ThresholdConfig::uniform(1.0));
    }

    #[test]
    fn test_partial_threshold_keeps_other_axes() {
        let raw = r#"{ "orientation": { "filter_type": "lpf2", "threshold": { "gamma": 2 } } }"#;
        let config: AppConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.orientation.filter_type, FilterKind::LowPass);
        assert_eq!(
            config.orientation.threshold,
            ThresholdConfig {
                alpha: 1.0,
                beta: 1.0,
                gamma: 2.0,
            }
        );
        config.validate().unwrap();
    }

    #[test]
    fn test_filter_aliases_select_low_pass() {
        for name in ["\"lpf\"", "\"lpf2\"", "\"low_pass\""] {
            let kind: FilterKind = serde_json::from_str(name).unwrap();
            assert_eq!(kind, FilterKind::LowPass);
        }
        assert_eq!("LPF2".parse::<FilterKind>().unwrap(), FilterKind::LowPass);
        assert_eq!("none".parse::<FilterKind>().unwrap(), FilterKind::None);
        assert!("kalman".parse::<FilterKind>().is_err());
    }

    #[test]
    fn test_transition_mode_parse() {
        assert_eq!("jump".parse::<TransitionMode>().unwrap(), TransitionMode::Jump);
        assert_eq!(" Seek ".parse::<TransitionMode>().unwrap(), TransitionMode::Seek);
        assert!("glide".parse::<TransitionMode>().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_coefficient() {
        let mut config = AppConfig::default();
        config.orientation.coefficient = 1.0;
        assert!(matches!(
            config.validate(),
            Err(TiltscrubError::Config { .. })
        ));

        config.orientation.coefficient = 0.0;
        assert!(config.validate().is_err());

        // passthrough ignores the coefficient
        config.orientation.filter_type = FilterKind::None;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_non_positive_threshold() {
        let mut config = AppConfig::default();
        config.orientation.threshold.beta = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("threshold.beta"));
    }

    #[test]
    fn test_validate_rejects_degenerate_scrub() {
        let mut config = AppConfig::default();
        config.scrub.max_gamma = 0.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scrub.fps = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scrub.stop_threshold = -1.0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.scrub.stop_threshold = 0.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_missing_file() {
        let path = std::env::temp_dir().join("tiltscrub-does-not-exist.json");
        assert!(matches!(
            AppConfig::load_from(&path),
            Err(TiltscrubError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let path = std::env::temp_dir().join(format!(
            "tiltscrub-config-test-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "scrub": { "fps": -30 } }"#).unwrap();
        let result = AppConfig::load_from(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(result, Err(TiltscrubError::Config { .. })));
    }
}
