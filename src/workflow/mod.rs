//! Workflow Module
//!
//! Runs landmark frames through the gesture core, live or from a recording.

pub mod pipeline;
pub mod session;

pub use pipeline::{FrameOutcome, GesturePipeline, SessionStats};
pub use session::{run_live, run_replay, LiveOptions, SessionEnd};
