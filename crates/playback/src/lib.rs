//! TiltScrub Playback
//!
//! Drives a media player from orientation change notifications:
//! - **Geometry:** gamma-to-time mapping and frame counts
//! - **Scheduler:** frame-by-frame seeking with one seek in flight at a time
//! - **Scrub controller:** player lifecycle, jump or seek transitions, deadband
//! - **Session:** wires an orientation controller to one player
//!
//! The player itself sits behind [`PlaybackEngine`]; [`SimulatedPlayer`] is an
//! in-memory implementation with caller-controlled seek latency.

pub mod engine;
pub mod geometry;
pub mod scheduler;
pub mod scrub;
pub mod session;
pub mod simulated;

pub use engine::{PlaybackEngine, PlayerSignal};
pub use geometry::{clamp_gamma, gamma_to_time, PlaybackGeometry};
pub use scheduler::{FrameStepScheduler, ScrubState, StepPhase};
pub use scrub::{PlaybackScrubController, ScrubStats};
pub use session::ScrubSession;
pub use simulated::SimulatedPlayer;
