//! TiltScrub Sensor Model
//!
//! Defines the data contracts shared by the orientation and playback crates:
//! - **Samples:** 3-axis orientation readings (alpha, beta, gamma) in degrees
//! - **Traces:** JSONL recordings of timestamped samples with a metadata header
//! - **Capabilities:** which sensor signals a device reported as available

pub mod sample;
pub mod trace;

pub use sample::*;
pub use trace::*;
