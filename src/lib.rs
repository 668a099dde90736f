//! # Gesture Media Control
//!
//! Turns hand gestures seen by a webcam into media-control commands
//! (play/pause, next, previous, volume up/down, like).
//!
//! ## Overview
//!
//! A detector sidecar owns the camera and the hand landmark model and streams
//! one landmark set per frame. This library extracts which fingers are
//! extended, classifies a gesture, and fires the mapped media key through an
//! OS-specific input sink, at most once per cooldown window.
//!
//! ## Quick Start
//!
//! ```
//! use gesture_media_control::dispatch::{ActionCommand, Dispatcher};
//! use gesture_media_control::gesture::{Gesture, GestureClassifier};
//! use gesture_media_control::hand::{fingers_up, Landmark, LandmarkSet};
//! use gesture_media_control::sink::LogOnlySink;
//! use gesture_media_control::time::Timestamp;
//!
//! // A hand with every finger curled
//! let hand = LandmarkSet::new([Landmark::new(0.5, 0.5); 21]);
//! let fingers = fingers_up(&hand);
//!
//! let classifier = GestureClassifier::default();
//! assert_eq!(classifier.classify(&hand, fingers), Gesture::None);
//!
//! let mut dispatcher = Dispatcher::new(Box::new(LogOnlySink::new()));
//! let fired = dispatcher.dispatch(Gesture::OpenPalm, Timestamp::from_millis(0));
//! assert_eq!(fired.map(|d| d.command), Some(ActionCommand::PlayPause));
//! ```
//!
//! ## Architecture
//!
//! - [`hand`]: landmark model and finger-state extraction
//! - [`gesture`]: priority-ordered gesture rules
//! - [`dispatch`]: action mapping and the cooldown state machine
//! - [`sink`]: platform media-key injection
//! - [`capture`]: detector sidecar, replay files and the frame ring buffer
//! - [`time`]: monotonic timestamps
//! - [`workflow`]: per-frame pipeline and the live/replay session loops
//! - [`app`]: CLI and configuration management
//!
//! ## Frame Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Detector   │───▶│ Ring Buffer │───▶│  Finger +   │───▶│ Dispatcher  │───▶│ Input Sink  │
//! │  (sidecar)  │    │ (latest wins│    │  Gesture    │    │ (cooldown)  │    │ (media key) │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//! ```

pub mod time;
pub mod hand;
pub mod gesture;
pub mod dispatch;
pub mod sink;
pub mod capture;
pub mod workflow;
pub mod app;

// Re-export commonly used types
pub use capture::{HandFrame, LandmarkSource};
pub use dispatch::{ActionCommand, Dispatched, Dispatcher};
pub use gesture::{Gesture, GestureClassifier, GestureThresholds};
pub use hand::{fingers_up, FingerState, Landmark, LandmarkSet};
pub use sink::InputEventSink;
pub use time::Timestamp;
pub use workflow::{GesturePipeline, SessionStats};

/// Result type alias for gesture media control
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for gesture media control
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Frame read failed: {0}")]
    FrameRead(String),

    #[error("Malformed landmark input: {0}")]
    MalformedLandmarks(String),

    #[error("Detector protocol error: {0}")]
    Protocol(String),

    #[error("Input sink error: {0}")]
    Sink(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
