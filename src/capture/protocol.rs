//! Detector Line Protocol
//!
//! The detector prints `READY` once its camera is open, then one JSON object
//! per processed frame:
//!
//! ```text
//! READY
//! {"frame":0,"timestamp_ms":0,"width":640,"height":480,"hands":[]}
//! {"frame":1,"timestamp_ms":33,"width":640,"height":480,"hands":[{"handedness":"Right","score":0.93,"landmarks":[{"x":0.51,"y":0.62,"z":0.0}, ...]}]}
//! {"frame":2,"error":"camera read failed"}
//! ```
//!
//! Replay files use the same frame lines without the `READY` header. Blank
//! lines and lines starting with `#` are ignored.

use super::source::{DetectedHand, HandFrame};
use crate::hand::{Handedness, Landmark, LandmarkSet};
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use tracing::warn;

/// Handshake line printed by the detector once the camera is open.
pub const READY_LINE: &str = "READY";

/// One frame as printed by the detector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionMessage {
    /// Frame counter assigned by the detector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<u64>,
    /// Capture time in milliseconds on the detector's clock
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp_ms: Option<u64>,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    /// Detected hands, most confident first
    #[serde(default)]
    pub hands: Vec<HandMessage>,
    /// Set when the detector failed to read a frame
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// One detected hand.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HandMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
    pub landmarks: Vec<Landmark>,
}

impl DetectionMessage {
    /// Convert into a frame, keeping only the first hand.
    ///
    /// `fallback_sequence` is used when the detector omitted `frame`.
    pub fn into_frame(self, fallback_sequence: u64) -> crate::Result<HandFrame> {
        if let Some(error) = self.error {
            return Err(crate::Error::FrameRead(error));
        }

        let hand = match self.hands.into_iter().next() {
            Some(hand) => Some(DetectedHand {
                landmarks: LandmarkSet::try_from(hand.landmarks)?,
                handedness: hand.handedness.as_deref().and_then(Handedness::from_label),
                score: hand.score,
            }),
            None => None,
        };

        Ok(HandFrame {
            sequence: self.frame.unwrap_or(fallback_sequence),
            timestamp_ms: self.timestamp_ms,
            width: self.width,
            height: self.height,
            hand,
        })
    }
}

impl From<&HandFrame> for DetectionMessage {
    fn from(frame: &HandFrame) -> Self {
        Self {
            frame: Some(frame.sequence),
            timestamp_ms: frame.timestamp_ms,
            width: frame.width,
            height: frame.height,
            hands: frame
                .hand
                .iter()
                .map(|hand| HandMessage {
                    handedness: hand.handedness.map(|h| format!("{:?}", h)),
                    score: hand.score,
                    landmarks: hand.landmarks.points().to_vec(),
                })
                .collect(),
            error: None,
        }
    }
}

/// Parse one frame line.
pub fn parse_frame_line(line: &str, fallback_sequence: u64) -> crate::Result<HandFrame> {
    let message: DetectionMessage = serde_json::from_str(line)
        .map_err(|e| crate::Error::Protocol(format!("invalid frame line: {}", e)))?;
    message.into_frame(fallback_sequence)
}

/// Label sent back to the detector for its preview window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayMessage {
    pub overlay: String,
}

/// Incremental reader of frame lines.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    line: String,
    line_number: u64,
    frames_decoded: u64,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the next frame. `Ok(None)` at end of input.
    ///
    /// Read errors become [`crate::Error::FrameRead`]; bad lines become
    /// [`crate::Error::Protocol`] or [`crate::Error::MalformedLandmarks`].
    pub fn read_next<R: BufRead>(&mut self, reader: &mut R) -> crate::Result<Option<HandFrame>> {
        loop {
            self.line.clear();
            let read = reader
                .read_line(&mut self.line)
                .map_err(|e| crate::Error::FrameRead(e.to_string()))?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let trimmed = self.line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            if trimmed == READY_LINE {
                warn!("Ignoring repeated {} at line {}", READY_LINE, self.line_number);
                continue;
            }

            let frame = parse_frame_line(trimmed, self.frames_decoded).map_err(|e| match e {
                crate::Error::Protocol(msg) => {
                    crate::Error::Protocol(format!("line {}: {}", self.line_number, msg))
                }
                other => other,
            })?;
            self.frames_decoded += 1;
            return Ok(Some(frame));
        }
    }

    /// Frames decoded so far.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }
}
