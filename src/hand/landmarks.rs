//! Hand Landmarks
//!
//! 21 normalized keypoints per hand using the MediaPipe index convention.
//! Coordinates are fractions of the frame width/height with y growing
//! downward. Frames are mirrored before detection, so x grows to the right
//! from the user's point of view.

use serde::{Deserialize, Serialize};

/// Number of landmarks in a hand set.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Fingertip indices: thumb, index, middle, ring, pinky
pub const TIP_IDS: [usize; 5] = [THUMB_TIP, INDEX_TIP, MIDDLE_TIP, RING_TIP, PINKY_TIP];

/// A single normalized hand keypoint.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    /// Horizontal position (0.0 to 1.0 of frame width)
    pub x: f32,
    /// Vertical position (0.0 to 1.0 of frame height, 0 = top)
    pub y: f32,
    /// Depth relative to the wrist; carried but unused by classification
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    /// Create a landmark at (x, y) with zero depth.
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Which hand the detector believes it saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Parse the detector's label ("Left"/"Right", case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "left" => Some(Self::Left),
            "right" => Some(Self::Right),
            _ => None,
        }
    }
}

/// The 21 landmarks of one detected hand.
///
/// Always holds exactly [`LANDMARK_COUNT`] points; sets of any other size are
/// rejected at construction with [`crate::Error::MalformedLandmarks`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LandmarkSet {
    points: [Landmark; LANDMARK_COUNT],
}

impl LandmarkSet {
    /// Build a set from a fixed-size array.
    pub const fn new(points: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    /// Landmark at a semantic index (see the index constants in this module).
    ///
    /// # Panics
    /// Panics if `index >= LANDMARK_COUNT`; callers use the module constants.
    #[inline]
    pub fn get(&self, index: usize) -> Landmark {
        self.points[index]
    }

    /// All points in index order.
    pub fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.points
    }

    /// Index fingertip displacement from its base knuckle, `(dx, dy)`.
    ///
    /// Negative `dy` means the fingertip is above the knuckle.
    pub fn index_direction(&self) -> (f32, f32) {
        let tip = self.points[INDEX_TIP];
        let base = self.points[INDEX_MCP];
        (tip.x - base.x, tip.y - base.y)
    }
}

impl TryFrom<Vec<Landmark>> for LandmarkSet {
    type Error = crate::Error;

    fn try_from(points: Vec<Landmark>) -> Result<Self, Self::Error> {
        let len = points.len();
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            crate::Error::MalformedLandmarks(format!(
                "expected {} landmarks, got {}",
                LANDMARK_COUNT, len
            ))
        })?;
        Ok(Self { points })
    }
}
