//! Reason codes for every per-frame decision

use serde::{Deserialize, Serialize};

use crate::types::EyeBlink;

/// Why a frame did or did not produce a blink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum DecisionReason {
    // =========================================================================
    // R100: Emitted
    // =========================================================================
    /// Left eye closed alone
    R100_BLINK_LEFT,
    /// Right eye closed alone
    R100_BLINK_RIGHT,
    /// Both eyes closed and both-eye blinks are enabled
    R100_BLINK_BOTH,

    // =========================================================================
    // R200: Not emitted
    // =========================================================================
    /// Last blink is still inside the cooldown window
    R200_COOLDOWN_ACTIVE,
    /// Both eyes closed but both-eye blinks are disabled (cooldown stays unarmed)
    R201_BOTH_SUPPRESSED,
    /// Neither eye above the sensitivity threshold
    R202_EYES_OPEN,
    /// Tracker frame without a face; the detector was not consulted
    R203_NO_FACE,

    // =========================================================================
    // R300: Caller contract
    // =========================================================================
    /// Timestamp is earlier than the last emitted blink
    R300_TIMESTAMP_REGRESSED,
}

impl DecisionReason {
    /// Reason attached to an emitted blink
    pub fn for_blink(blink: EyeBlink) -> Self {
        match blink {
            EyeBlink::Left => Self::R100_BLINK_LEFT,
            EyeBlink::Right => Self::R100_BLINK_RIGHT,
            EyeBlink::Both => Self::R100_BLINK_BOTH,
        }
    }

    /// Get the code string (for logging)
    pub fn code(&self) -> &'static str {
        match self {
            Self::R100_BLINK_LEFT => "R100_BLINK_LEFT",
            Self::R100_BLINK_RIGHT => "R100_BLINK_RIGHT",
            Self::R100_BLINK_BOTH => "R100_BLINK_BOTH",
            Self::R200_COOLDOWN_ACTIVE => "R200_COOLDOWN_ACTIVE",
            Self::R201_BOTH_SUPPRESSED => "R201_BOTH_SUPPRESSED",
            Self::R202_EYES_OPEN => "R202_EYES_OPEN",
            Self::R203_NO_FACE => "R203_NO_FACE",
            Self::R300_TIMESTAMP_REGRESSED => "R300_TIMESTAMP_REGRESSED",
        }
    }

    /// Get human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            Self::R100_BLINK_LEFT => "Left blink",
            Self::R100_BLINK_RIGHT => "Right blink",
            Self::R100_BLINK_BOTH => "Both-eye blink",
            Self::R200_COOLDOWN_ACTIVE => "Cooldown active",
            Self::R201_BOTH_SUPPRESSED => "Both eyes closed, not reported",
            Self::R202_EYES_OPEN => "Eyes open",
            Self::R203_NO_FACE => "No face in frame",
            Self::R300_TIMESTAMP_REGRESSED => "Timestamp went backwards",
        }
    }
}

impl std::fmt::Display for DecisionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.description())
    }
}
