//! Action Commands

use crate::gesture::Gesture;
use serde::{Deserialize, Serialize};

/// Media-control operation selected by a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActionCommand {
    PlayPause,
    Next,
    Previous,
    VolumeUp,
    VolumeDown,
    /// No media key exists for this; it is reported but never injected.
    Like,
}

impl ActionCommand {
    /// Every command.
    pub const ALL: [ActionCommand; 6] = [
        ActionCommand::PlayPause,
        ActionCommand::Next,
        ActionCommand::Previous,
        ActionCommand::VolumeUp,
        ActionCommand::VolumeDown,
        ActionCommand::Like,
    ];

    /// Command mapped to a gesture, if any.
    pub fn for_gesture(gesture: Gesture) -> Option<Self> {
        match gesture {
            Gesture::IndexRight => Some(Self::Next),
            Gesture::IndexLeft => Some(Self::Previous),
            Gesture::IndexUp => Some(Self::VolumeDown),
            Gesture::OpenPalm => Some(Self::PlayPause),
            Gesture::IndexMiddlePeace => Some(Self::VolumeUp),
            Gesture::ThumbOnly => Some(Self::Like),
            Gesture::None => None,
        }
    }

    /// Human-readable label shown when the command fires.
    pub fn label(&self) -> &'static str {
        match self {
            Self::PlayPause => "Play/Pause (open palm)",
            Self::Next => "Next (index RIGHT)",
            Self::Previous => "Previous (index LEFT)",
            Self::VolumeUp => "Volume Up (two fingers)",
            Self::VolumeDown => "Volume Down (index UP)",
            Self::Like => "Like (thumbs up)",
        }
    }

    /// Line printed to the console when the command fires.
    ///
    /// Like has no media key, so its console line reports the like itself;
    /// its label remains the on-screen text.
    pub fn console_line(&self) -> &'static str {
        match self {
            Self::Like => "Liked song (thumbs up)",
            other => other.label(),
        }
    }

    /// Short identifier used in logs and statistics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PlayPause => "play-pause",
            Self::Next => "next",
            Self::Previous => "previous",
            Self::VolumeUp => "volume-up",
            Self::VolumeDown => "volume-down",
            Self::Like => "like",
        }
    }

    /// Whether the command is delivered to the input sink.
    pub fn uses_sink(&self) -> bool {
        !matches!(self, Self::Like)
    }
}

impl std::fmt::Display for ActionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gesture_mapping_table() {
        assert_eq!(ActionCommand::for_gesture(Gesture::IndexRight), Some(ActionCommand::Next));
        assert_eq!(ActionCommand::for_gesture(Gesture::IndexLeft), Some(ActionCommand::Previous));
        assert_eq!(ActionCommand::for_gesture(Gesture::IndexUp), Some(ActionCommand::VolumeDown));
        assert_eq!(ActionCommand::for_gesture(Gesture::OpenPalm), Some(ActionCommand::PlayPause));
        assert_eq!(
            ActionCommand::for_gesture(Gesture::IndexMiddlePeace),
            Some(ActionCommand::VolumeUp)
        );
        assert_eq!(ActionCommand::for_gesture(Gesture::ThumbOnly), Some(ActionCommand::Like));
        assert_eq!(ActionCommand::for_gesture(Gesture::None), None);
    }

    #[test]
    fn test_every_recognized_gesture_maps() {
        for gesture in Gesture::ALL {
            assert_eq!(
                ActionCommand::for_gesture(gesture).is_some(),
                gesture.is_recognized(),
                "{gesture}"
            );
        }
    }

    #[test]
    fn test_only_like_skips_sink() {
        let skipped: Vec<_> = ActionCommand::ALL.iter().filter(|c| !c.uses_sink()).collect();
        assert_eq!(skipped, vec![&ActionCommand::Like]);
    }

    #[test]
    fn test_console_line_is_label_except_like() {
        for command in ActionCommand::ALL {
            if command == ActionCommand::Like {
                assert_eq!(command.console_line(), "Liked song (thumbs up)");
            } else {
                assert_eq!(command.console_line(), command.label());
            }
        }
    }

    #[test]
    fn test_labels() {
        assert_eq!(ActionCommand::Next.label(), "Next (index RIGHT)");
        assert_eq!(ActionCommand::Like.label(), "Like (thumbs up)");
        assert_eq!(ActionCommand::VolumeUp.to_string(), "volume-up");
    }
}
