//! Gesture classification
//!
//! Maps a landmark set plus its finger-state vector to one gesture label
//! using a fixed, priority-ordered rule list.

pub mod classifier;

pub use classifier::{
    Gesture, GestureClassifier, GestureThresholds, DEFAULT_DIRECTION_THRESHOLD,
    DEFAULT_VERTICAL_ALIGNMENT_THRESHOLD,
};
