//! Blink event and detector phase definitions

use colored::Color;
use serde::{Deserialize, Serialize};

/// Which eye(s) produced a detected blink, from the user's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EyeBlink {
    /// Left eye closed, right eye open
    Left,
    /// Right eye closed, left eye open
    Right,
    /// Both eyes closed at once
    Both,
}

impl EyeBlink {
    pub const ALL: [EyeBlink; 3] = [EyeBlink::Left, EyeBlink::Right, EyeBlink::Both];

    /// Terminal color for this side
    pub fn color(&self) -> Color {
        match self {
            EyeBlink::Left => Color::Cyan,
            EyeBlink::Right => Color::Magenta,
            EyeBlink::Both => Color::Yellow,
        }
    }

    /// Short glyph for terminal display
    pub fn glyph(&self) -> &'static str {
        match self {
            EyeBlink::Left => "◐",
            EyeBlink::Right => "◑",
            EyeBlink::Both => "●",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EyeBlink::Left => "left",
            EyeBlink::Right => "right",
            EyeBlink::Both => "both",
        }
    }
}

impl std::fmt::Display for EyeBlink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EyeBlink::Left => "LEFT",
            EyeBlink::Right => "RIGHT",
            EyeBlink::Both => "BOTH",
        };
        write!(f, "{}", name)
    }
}

/// The two phases of a detector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetectorPhase {
    /// Ready to classify the next frame
    Armed,
    /// Inside the cooldown window of the last emitted blink
    Suppressed,
}

impl std::fmt::Display for DetectorPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            DetectorPhase::Armed => "ARMED",
            DetectorPhase::Suppressed => "SUPPRESSED",
        };
        write!(f, "{}", name)
    }
}
