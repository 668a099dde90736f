//! Finger-State Extraction
//!
//! Derives which fingers are extended from a single landmark set.
//!
//! - Thumb: up when its tip is left of the IP joint in the mirrored frame.
//!   This only holds for a right hand facing a mirrored front camera; a left
//!   hand or a rotated wrist reads wrong. Known approximation.
//! - Index..pinky: up when the tip is strictly above the PIP joint
//!   (smaller y). Equal height reads as down.

use super::landmarks::{LandmarkSet, TIP_IDS};
use serde::{Deserialize, Serialize};

/// The five fingers, in vector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

impl Finger {
    /// All fingers in vector order.
    pub const ALL: [Finger; 5] = [
        Finger::Thumb,
        Finger::Index,
        Finger::Middle,
        Finger::Ring,
        Finger::Pinky,
    ];

    /// Position in the finger-state vector.
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Extended/curled flags for thumb, index, middle, ring, pinky.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FingerState([bool; 5]);

impl FingerState {
    /// Build from raw flags in vector order.
    pub const fn new(flags: [bool; 5]) -> Self {
        Self(flags)
    }

    /// Build from 0/1 values, the notation used when reasoning about poses.
    pub fn from_bits(bits: [u8; 5]) -> Self {
        Self(bits.map(|b| b != 0))
    }

    /// Whether the given finger is extended.
    #[inline]
    pub fn is_up(&self, finger: Finger) -> bool {
        self.0[finger.index()]
    }

    /// Number of extended fingers.
    pub fn count_up(&self) -> usize {
        self.0.iter().filter(|&&up| up).count()
    }

    /// Number of extended fingers excluding the thumb.
    pub fn count_up_without_thumb(&self) -> usize {
        self.0[1..].iter().filter(|&&up| up).count()
    }

    /// Raw flags in vector order.
    pub fn as_array(&self) -> [bool; 5] {
        self.0
    }

    /// 0/1 values in vector order.
    pub fn to_bits(&self) -> [u8; 5] {
        self.0.map(u8::from)
    }
}

/// Which fingers are extended in `landmarks`.
///
/// Pure function of its input: the same set always yields the same vector.
pub fn fingers_up(landmarks: &LandmarkSet) -> FingerState {
    let mut flags = [false; 5];

    let thumb_tip = landmarks.get(TIP_IDS[0]);
    let thumb_ip = landmarks.get(TIP_IDS[0] - 1);
    flags[0] = thumb_tip.x < thumb_ip.x;

    for finger in 1..5 {
        let tip = landmarks.get(TIP_IDS[finger]);
        let pip = landmarks.get(TIP_IDS[finger] - 2);
        flags[finger] = tip.y < pip.y;
    }

    FingerState(flags)
}
