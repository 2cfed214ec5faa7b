//! TiltScrub Orientation
//!
//! Turns a noisy stream of device-orientation samples into sparse change
//! notifications:
//! - **Filter:** per-axis smoothing (passthrough or single-pole low-pass)
//! - **Change detection:** independent per-axis thresholds with a shared baseline
//! - **Controller:** filter, detect, and notify a registered listener
//! - **Sources:** trace replay and synthetic sweeps behind one trait
//!
//! Everything here is synchronous: each sample runs to completion before the
//! next one is accepted.

pub mod change;
pub mod controller;
pub mod filter;
pub mod source;
pub mod writer;

pub use change::{has_changed, ChangeDetector};
pub use controller::{OrientationController, OrientationListener};
pub use filter::OrientationFilter;
pub use source::{log_capabilities, OrientationSource, ReplaySource, SweepSource};
pub use writer::TraceWriter;
