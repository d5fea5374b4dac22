//! Per-frame decision output for terminal and JSON display

use chrono::{DateTime, Utc};
use colored::Colorize;
use serde::{Deserialize, Serialize};

use crate::types::{DecisionReason, DetectorPhase, EyeBlink};

/// Outcome of feeding one frame to the detector
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlinkDecision {
    /// Wall-clock time the decision was made
    pub decided_at: DateTime<Utc>,
    /// Frame timestamp (seconds, caller's monotonic clock)
    pub timestamp_s: f64,
    /// Emitted blink, if any
    pub blink: Option<EyeBlink>,
    /// Left eye classified closed
    pub left_closed: bool,
    /// Right eye classified closed
    pub right_closed: bool,
    /// Why this frame did or did not emit
    pub reason: DecisionReason,
    /// Detector phase after the frame
    pub phase: DetectorPhase,
}

impl BlinkDecision {
    pub fn new(
        timestamp_s: f64,
        blink: Option<EyeBlink>,
        (left_closed, right_closed): (bool, bool),
        reason: DecisionReason,
        phase: DetectorPhase,
    ) -> Self {
        Self {
            decided_at: Utc::now(),
            timestamp_s,
            blink,
            left_closed,
            right_closed,
            reason,
            phase,
        }
    }

    /// Format for terminal display (with colors)
    pub fn to_terminal_string(&self) -> String {
        let eyes = format!("L={} R={}", eye_mark(self.left_closed), eye_mark(self.right_closed));
        match self.blink {
            Some(blink) => format!(
                "{} {} t={:.3}s | {} | {}",
                blink.glyph(),
                blink.to_string().bold(),
                self.timestamp_s,
                eyes,
                self.reason.code()
            )
            .color(blink.color())
            .to_string(),
            None => format!(
                "· t={:.3}s | {} | phase={} | {}",
                self.timestamp_s,
                eyes,
                self.phase,
                self.reason.code()
            )
            .dimmed()
            .to_string(),
        }
    }

    /// Format for parseable output (no colors)
    pub fn to_parseable_string(&self) -> String {
        format!(
            "t={:.3} | blink={} | left_closed={} | right_closed={} | phase={} | reason={}",
            self.timestamp_s,
            self.blink.map(|b| b.as_str()).unwrap_or("none"),
            self.left_closed,
            self.right_closed,
            self.phase,
            self.reason.code()
        )
    }
}

fn eye_mark(closed: bool) -> &'static str {
    if closed {
        "closed"
    } else {
        "open"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parseable_string() {
        let decision = BlinkDecision::new(
            1.25,
            Some(EyeBlink::Left),
            (true, false),
            DecisionReason::R100_BLINK_LEFT,
            DetectorPhase::Suppressed,
        );
        assert_eq!(
            decision.to_parseable_string(),
            "t=1.250 | blink=left | left_closed=true | right_closed=false | phase=SUPPRESSED | reason=R100_BLINK_LEFT"
        );
    }

    #[test]
    fn test_terminal_string_mentions_reason() {
        let decision = BlinkDecision::new(
            0.0,
            None,
            (false, false),
            DecisionReason::R202_EYES_OPEN,
            DetectorPhase::Armed,
        );
        assert!(decision.to_terminal_string().contains("R202_EYES_OPEN"));
    }
}
