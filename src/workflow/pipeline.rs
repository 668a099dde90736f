//! Per-frame gesture pipeline
//!
//! landmarks → finger states → gesture → cooldown dispatch, plus the
//! counters reported at the end of a session.

use crate::capture::HandFrame;
use crate::dispatch::{ActionCommand, Dispatched, Dispatcher};
use crate::gesture::{Gesture, GestureClassifier};
use crate::hand::{fingers_up, FingerState};
use crate::time::Timestamp;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{info, trace};

/// What happened to one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    pub sequence: u64,
    /// Finger states, when a hand was visible
    pub fingers: Option<FingerState>,
    pub gesture: Gesture,
    /// The action fired on this frame, if any
    pub dispatched: Option<Dispatched>,
}

impl FrameOutcome {
    /// Label to draw over this frame. Only the frame that fired shows it.
    pub fn overlay_label(&self) -> Option<&'static str> {
        self.dispatched.map(|d| d.label)
    }
}

/// Session counters.
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub started_at: DateTime<Utc>,
    pub frames_processed: u64,
    pub frames_with_hand: u64,
    /// Captured frames never processed because a newer one was ready
    pub frames_skipped: u64,
    /// Recognized gestures by name
    pub gestures: BTreeMap<&'static str, u64>,
    /// Fired actions by command
    pub actions: BTreeMap<ActionCommand, u64>,
    /// Recognized gestures dropped by the cooldown
    pub suppressed: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            frames_processed: 0,
            frames_with_hand: 0,
            frames_skipped: 0,
            gestures: BTreeMap::new(),
            actions: BTreeMap::new(),
            suppressed: 0,
        }
    }

    /// Total actions fired.
    pub fn actions_fired(&self) -> u64 {
        self.actions.values().sum()
    }

    /// Times `command` fired.
    pub fn action_count(&self, command: ActionCommand) -> u64 {
        self.actions.get(&command).copied().unwrap_or(0)
    }

    fn record(&mut self, outcome: &FrameOutcome) {
        self.frames_processed += 1;
        if outcome.fingers.is_some() {
            self.frames_with_hand += 1;
        }
        if outcome.gesture.is_recognized() {
            *self.gestures.entry(outcome.gesture.as_str()).or_insert(0) += 1;
            match outcome.dispatched {
                Some(d) => *self.actions.entry(d.command).or_insert(0) += 1,
                None => self.suppressed += 1,
            }
        }
    }

    /// Write the session summary to the log.
    pub fn log_summary(&self) {
        let elapsed = Utc::now().signed_duration_since(self.started_at);
        info!(
            "Session: {} frames ({} with a hand, {} skipped) in {}s",
            self.frames_processed,
            self.frames_with_hand,
            self.frames_skipped,
            elapsed.num_seconds()
        );
        for (command, count) in &self.actions {
            info!("  {}: {}", command, count);
        }
        info!(
            "  {} actions fired, {} suppressed by cooldown",
            self.actions_fired(),
            self.suppressed
        );
    }
}

impl Default for SessionStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Runs the gesture core on each frame.
pub struct GesturePipeline {
    classifier: GestureClassifier,
    dispatcher: Dispatcher,
    stats: SessionStats,
}

impl GesturePipeline {
    pub fn new(classifier: GestureClassifier, dispatcher: Dispatcher) -> Self {
        Self {
            classifier,
            dispatcher,
            stats: SessionStats::new(),
        }
    }

    /// Process one frame at time `now`.
    ///
    /// Frames without a hand are treated as `Gesture::None` and never reach
    /// the classifier.
    pub fn process(&mut self, frame: &HandFrame, now: Timestamp) -> FrameOutcome {
        let (fingers, gesture) = match frame.landmarks() {
            Some(landmarks) => {
                let fingers = fingers_up(landmarks);
                (Some(fingers), self.classifier.classify(landmarks, fingers))
            }
            None => (None, Gesture::None),
        };

        let dispatched = self.dispatcher.dispatch(gesture, now);
        let outcome = FrameOutcome {
            sequence: frame.sequence,
            fingers,
            gesture,
            dispatched,
        };

        if let Some(label) = outcome.overlay_label() {
            trace!("Frame {} overlay: {}", frame.sequence, label);
        }
        self.stats.record(&outcome);
        outcome
    }

    /// Add frames the capture side skipped.
    pub fn record_skipped(&mut self, frames: u64) {
        self.stats.frames_skipped += frames;
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// Finish the session and take its counters.
    pub fn into_stats(self) -> SessionStats {
        self.stats
    }
}
