//! Hand model
//!
//! Landmark sets as produced by the pose detector and the finger-state
//! extraction built on top of them.

pub mod landmarks;
pub mod fingers;

pub use fingers::{fingers_up, Finger, FingerState};
pub use landmarks::{Handedness, Landmark, LandmarkSet, LANDMARK_COUNT};
