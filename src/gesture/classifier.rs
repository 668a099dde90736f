//! Priority-Ordered Gesture Rules
//!
//! Rules are evaluated top to bottom and the first rule that *decides*
//! wins. A rule decides either a concrete gesture or [`Gesture::None`]:
//!
//! 1. Index only (exactly one finger up, and it is the index): decides on
//!    the pointing direction, or `None` when no threshold is crossed. Once
//!    this rule applies, no later rule is consulted.
//! 2. All five up: open palm.
//! 3. Thumb up, others down: thumb only.
//! 4. Index and middle up, the rest down: peace.
//!
//! Anything else is `None`.

use crate::hand::{Finger, FingerState, LandmarkSet};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Horizontal index displacement (fraction of frame width) that counts as pointing left/right.
pub const DEFAULT_DIRECTION_THRESHOLD: f32 = 0.07;

/// Maximum horizontal drift (fraction of frame width) for an upward point.
pub const DEFAULT_VERTICAL_ALIGNMENT_THRESHOLD: f32 = 0.05;

/// Classified hand gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gesture {
    /// Index finger alone, pointing right.
    IndexRight,
    /// Index finger alone, pointing left.
    IndexLeft,
    /// Index finger alone, pointing up.
    IndexUp,
    /// All five fingers extended.
    OpenPalm,
    /// Thumb extended, other fingers curled.
    ThumbOnly,
    /// Index and middle extended ("peace" sign).
    IndexMiddlePeace,
    /// No recognized gesture.
    None,
}

impl Gesture {
    /// Every gesture, recognized ones first.
    pub const ALL: [Gesture; 7] = [
        Gesture::IndexRight,
        Gesture::IndexLeft,
        Gesture::IndexUp,
        Gesture::OpenPalm,
        Gesture::ThumbOnly,
        Gesture::IndexMiddlePeace,
        Gesture::None,
    ];

    /// Short identifier used in logs and statistics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::IndexRight => "index-right",
            Self::IndexLeft => "index-left",
            Self::IndexUp => "index-up",
            Self::OpenPalm => "open-palm",
            Self::ThumbOnly => "thumb-only",
            Self::IndexMiddlePeace => "peace",
            Self::None => "none",
        }
    }

    /// Whether this is an actual gesture rather than `None`.
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl std::fmt::Display for Gesture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tunable thresholds in normalized frame units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureThresholds {
    /// |dx| beyond which the index finger points left/right
    pub direction_threshold: f32,
    /// |dx| below which an upward point counts as vertical
    pub vertical_alignment_threshold: f32,
}

impl Default for GestureThresholds {
    fn default() -> Self {
        Self {
            direction_threshold: DEFAULT_DIRECTION_THRESHOLD,
            vertical_alignment_threshold: DEFAULT_VERTICAL_ALIGNMENT_THRESHOLD,
        }
    }
}

/// Inputs shared by every rule.
struct RuleInput {
    fingers: FingerState,
    /// Index tip minus index base knuckle
    dx: f32,
    dy: f32,
}

/// Result of evaluating a single rule.
enum RuleOutcome {
    /// Precondition not met; consult the next rule.
    Pass,
    /// This rule owns the frame. Later rules are skipped.
    Decide(Gesture),
}

struct GestureRule {
    name: &'static str,
    evaluate: fn(&RuleInput, &GestureThresholds) -> RuleOutcome,
}

/// Evaluation order is priority order.
const RULES: [GestureRule; 4] = [
    GestureRule {
        name: "index-only",
        evaluate: index_only_rule,
    },
    GestureRule {
        name: "open-palm",
        evaluate: open_palm_rule,
    },
    GestureRule {
        name: "thumb-only",
        evaluate: thumb_only_rule,
    },
    GestureRule {
        name: "peace",
        evaluate: peace_rule,
    },
];

fn index_only_rule(input: &RuleInput, thresholds: &GestureThresholds) -> RuleOutcome {
    let fingers = input.fingers;
    if !(fingers.is_up(Finger::Index) && fingers.count_up() == 1) {
        return RuleOutcome::Pass;
    }

    let gesture = if input.dx > thresholds.direction_threshold {
        Gesture::IndexRight
    } else if input.dx < -thresholds.direction_threshold {
        Gesture::IndexLeft
    } else if input.dy < -thresholds.direction_threshold
        && input.dx.abs() < thresholds.vertical_alignment_threshold
    {
        Gesture::IndexUp
    } else {
        Gesture::None
    };
    RuleOutcome::Decide(gesture)
}

fn open_palm_rule(input: &RuleInput, _: &GestureThresholds) -> RuleOutcome {
    if input.fingers.count_up() == 5 {
        RuleOutcome::Decide(Gesture::OpenPalm)
    } else {
        RuleOutcome::Pass
    }
}

fn thumb_only_rule(input: &RuleInput, _: &GestureThresholds) -> RuleOutcome {
    let fingers = input.fingers;
    if fingers.is_up(Finger::Thumb) && fingers.count_up_without_thumb() == 0 {
        RuleOutcome::Decide(Gesture::ThumbOnly)
    } else {
        RuleOutcome::Pass
    }
}

fn peace_rule(input: &RuleInput, _: &GestureThresholds) -> RuleOutcome {
    let f = input.fingers;
    if f.is_up(Finger::Index)
        && f.is_up(Finger::Middle)
        && !f.is_up(Finger::Thumb)
        && !f.is_up(Finger::Ring)
        && !f.is_up(Finger::Pinky)
    {
        RuleOutcome::Decide(Gesture::IndexMiddlePeace)
    } else {
        RuleOutcome::Pass
    }
}

/// Stateless gesture classifier.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    thresholds: GestureThresholds,
}

impl GestureClassifier {
    /// Create a classifier with custom thresholds.
    pub fn new(thresholds: GestureThresholds) -> Self {
        Self { thresholds }
    }

    /// Thresholds in use.
    pub fn thresholds(&self) -> &GestureThresholds {
        &self.thresholds
    }

    /// Classify a hand. `fingers` must be `fingers_up(landmarks)`.
    pub fn classify(&self, landmarks: &LandmarkSet, fingers: FingerState) -> Gesture {
        let (dx, dy) = landmarks.index_direction();
        let input = RuleInput { fingers, dx, dy };

        for rule in &RULES {
            if let RuleOutcome::Decide(gesture) = (rule.evaluate)(&input, &self.thresholds) {
                trace!(
                    "rule {} decided {} (fingers={:?}, dx={:.3}, dy={:.3})",
                    rule.name,
                    gesture,
                    fingers.to_bits(),
                    dx,
                    dy
                );
                return gesture;
            }
        }

        Gesture::None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::landmarks::*;
    use crate::hand::{fingers_up, Landmark};

    /// Hand with the index base at (0.5, 0.5) and the tip displaced by (dx, dy).
    fn hand_with_index(dx: f32, dy: f32) -> LandmarkSet {
        let mut points = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        points[INDEX_MCP] = Landmark::new(0.5, 0.5);
        points[INDEX_TIP] = Landmark::new(0.5 + dx, 0.5 + dy);
        LandmarkSet::new(points)
    }

    fn classify_bits(bits: [u8; 5], dx: f32, dy: f32) -> Gesture {
        GestureClassifier::default().classify(&hand_with_index(dx, dy), FingerState::from_bits(bits))
    }

    #[test]
    fn test_index_right() {
        assert_eq!(classify_bits([0, 1, 0, 0, 0], 0.10, 0.0), Gesture::IndexRight);
    }

    #[test]
    fn test_index_left() {
        assert_eq!(classify_bits([0, 1, 0, 0, 0], -0.10, 0.0), Gesture::IndexLeft);
    }

    #[test]
    fn test_index_up() {
        assert_eq!(classify_bits([0, 1, 0, 0, 0], 0.02, -0.09), Gesture::IndexUp);
    }

    #[test]
    fn test_horizontal_wins_over_vertical() {
        // Pointing up and to the right: the right check comes first
        assert_eq!(classify_bits([0, 1, 0, 0, 0], 0.08, -0.20), Gesture::IndexRight);
    }

    #[test]
    fn test_index_up_requires_alignment() {
        // Up enough, but drifting too far sideways to be vertical
        assert_eq!(classify_bits([0, 1, 0, 0, 0], 0.06, -0.20), Gesture::None);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // Binary-exact values so the boundary is hit exactly
        let classifier = GestureClassifier::new(GestureThresholds {
            direction_threshold: 0.125,
            vertical_alignment_threshold: 0.0625,
        });
        let index_only = FingerState::from_bits([0, 1, 0, 0, 0]);
        assert_eq!(classifier.classify(&hand_with_index(0.125, 0.0), index_only), Gesture::None);
        assert_eq!(classifier.classify(&hand_with_index(-0.125, 0.0), index_only), Gesture::None);
        assert_eq!(classifier.classify(&hand_with_index(0.0, -0.125), index_only), Gesture::None);
        assert_eq!(classifier.classify(&hand_with_index(0.0625, -0.25), index_only), Gesture::None);
        assert_eq!(classifier.classify(&hand_with_index(0.0, -0.25), index_only), Gesture::IndexUp);
    }

    #[test]
    fn test_index_only_without_direction_is_none() {
        assert_eq!(classify_bits([0, 1, 0, 0, 0], 0.01, 0.01), Gesture::None);
    }

    #[test]
    fn test_open_palm() {
        assert_eq!(classify_bits([1, 1, 1, 1, 1], 0.20, 0.0), Gesture::OpenPalm);
    }

    #[test]
    fn test_thumb_only() {
        assert_eq!(classify_bits([1, 0, 0, 0, 0], 0.0, 0.0), Gesture::ThumbOnly);
    }

    #[test]
    fn test_peace() {
        assert_eq!(classify_bits([0, 1, 1, 0, 0], 0.20, 0.0), Gesture::IndexMiddlePeace);
    }

    #[test]
    fn test_peace_with_thumb_is_none() {
        assert_eq!(classify_bits([1, 1, 1, 0, 0], 0.0, 0.0), Gesture::None);
    }

    #[test]
    fn test_two_fingers_with_index_falls_through() {
        // Index + pinky is neither index-only nor peace
        assert_eq!(classify_bits([0, 1, 0, 0, 1], 0.20, 0.0), Gesture::None);
        assert_eq!(classify_bits([1, 1, 0, 0, 0], 0.20, 0.0), Gesture::None);
    }

    #[test]
    fn test_other_poses_are_none() {
        assert_eq!(classify_bits([0, 0, 0, 0, 0], 0.0, 0.0), Gesture::None);
        assert_eq!(classify_bits([0, 0, 1, 0, 0], 0.0, 0.0), Gesture::None);
        assert_eq!(classify_bits([0, 1, 1, 1, 1], 0.0, 0.0), Gesture::None);
    }

    #[test]
    fn test_custom_thresholds() {
        let classifier = GestureClassifier::new(GestureThresholds {
            direction_threshold: 0.15,
            vertical_alignment_threshold: 0.05,
        });
        let hand = hand_with_index(0.10, 0.0);
        assert_eq!(classifier.classify(&hand, FingerState::from_bits([0, 1, 0, 0, 0])), Gesture::None);
        assert_eq!(classifier.thresholds().direction_threshold, 0.15);
    }

    #[test]
    fn test_classify_from_extracted_fingers() {
        // Index extended and pointing right; all else curled
        let mut points = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
        points[INDEX_MCP] = Landmark::new(0.40, 0.60);
        points[INDEX_PIP] = Landmark::new(0.45, 0.55);
        points[INDEX_TIP] = Landmark::new(0.55, 0.50);
        let hand = LandmarkSet::new(points);
        let fingers = fingers_up(&hand);
        assert_eq!(fingers.to_bits(), [0, 1, 0, 0, 0]);
        assert_eq!(GestureClassifier::default().classify(&hand, fingers), Gesture::IndexRight);
    }

    #[test]
    fn test_gesture_strings() {
        assert_eq!(Gesture::IndexMiddlePeace.as_str(), "peace");
        assert_eq!(Gesture::OpenPalm.to_string(), "open-palm");
        assert!(Gesture::ThumbOnly.is_recognized());
        assert!(!Gesture::None.is_recognized());
    }
}
