//! Eye blink detector: threshold + cooldown + event selection
//!
//! Phases:
//! - ARMED → SUPPRESSED: a blink is emitted (cooldown armed)
//! - SUPPRESSED → ARMED: cooldown elapsed, evaluated lazily on the next frame
//!
//! Selection, first match wins:
//! - both closed → BOTH if enabled, otherwise nothing and the cooldown stays unarmed
//! - left only   → LEFT
//! - right only  → RIGHT
//! - neither     → nothing
//!
//! Timestamps are only compared with the last emitted blink. A frame earlier
//! than that blink is rejected with R300 and leaves the detector untouched;
//! any other backwards step between frames is judged like a normal frame.

use std::time::Duration;
use tracing::{debug, trace, warn};

use crate::core::cooldown::{CooldownGate, GateCheck};
use crate::core::observer::BlinkObserver;
use crate::core::threshold::ThresholdClassifier;
use crate::types::{BlinkDecision, DecisionReason, DetectorConfig, DetectorPhase, EyeBlink, EyeSample};

/// Debounced blink detector for one face
#[derive(Debug, Clone)]
pub struct EyeBlinkDetector {
    config: DetectorConfig,
    classifier: ThresholdClassifier,
    gate: CooldownGate,
    /// Time of the last emitted blink; the only state that changes
    last_blink: Option<Duration>,
}

impl EyeBlinkDetector {
    /// Create a detector in the ARMED phase
    pub fn new(config: DetectorConfig) -> Self {
        Self {
            config,
            classifier: ThresholdClassifier::new(config.sensitivity),
            gate: CooldownGate::new(config.cool_down),
            last_blink: None,
        }
    }

    /// Feed one frame, return the blink it produced (if any)
    pub fn update(&mut self, left: f32, right: f32, now: Duration) -> Option<EyeBlink> {
        self.evaluate(left, right, now).blink
    }

    /// Like `update`, and hands an emitted blink to `observer` before returning
    pub fn update_with<O>(&mut self, left: f32, right: f32, now: Duration, observer: &mut O) -> Option<EyeBlink>
    where
        O: BlinkObserver + ?Sized,
    {
        let blink = self.update(left, right, now);
        if let Some(blink) = blink {
            observer.blink_detected(blink);
        }
        blink
    }

    /// Feed a sample and get the full decision
    pub fn feed(&mut self, sample: &EyeSample) -> BlinkDecision {
        let mut decision = self.evaluate(sample.left, sample.right, sample.timestamp());
        decision.timestamp_s = sample.timestamp_s;
        decision
    }

    /// Feed one frame and explain the outcome
    pub fn evaluate(&mut self, left: f32, right: f32, now: Duration) -> BlinkDecision {
        let closure = self.classifier.classify(left, right);
        let (blink, reason) = self.select(closure, now);

        if let Some(blink) = blink {
            self.last_blink = Some(now);
            debug!(side = blink.as_str(), t = now.as_secs_f64(), "blink detected");
        }

        BlinkDecision::new(now.as_secs_f64(), blink, closure, reason, self.phase(now))
    }

    /// Decide without mutating anything
    fn select(&self, (left_closed, right_closed): (bool, bool), now: Duration) -> (Option<EyeBlink>, DecisionReason) {
        match self.gate.check(now, self.last_blink) {
            GateCheck::Open => {}
            GateCheck::Cooling(remaining) => {
                trace!(remaining_ms = remaining.as_millis() as u64, "cooldown active");
                return (None, DecisionReason::R200_COOLDOWN_ACTIVE);
            }
            GateCheck::Regressed => {
                warn!(
                    t = now.as_secs_f64(),
                    last_blink = self.last_blink.map(|l| l.as_secs_f64()),
                    "frame timestamp earlier than last blink, ignoring"
                );
                return (None, DecisionReason::R300_TIMESTAMP_REGRESSED);
            }
        }

        let blink = match (left_closed, right_closed) {
            (true, true) if self.config.detect_both_eyes => EyeBlink::Both,
            (true, true) => {
                trace!("both eyes closed, both-eye blinks disabled");
                return (None, DecisionReason::R201_BOTH_SUPPRESSED);
            }
            (true, false) => EyeBlink::Left,
            (false, true) => EyeBlink::Right,
            (false, false) => return (None, DecisionReason::R202_EYES_OPEN),
        };
        (Some(blink), DecisionReason::for_blink(blink))
    }

    /// Phase as seen from `now`
    pub fn phase(&self, now: Duration) -> DetectorPhase {
        if self.gate.is_open(now, self.last_blink) {
            DetectorPhase::Armed
        } else {
            DetectorPhase::Suppressed
        }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Time of the last emitted blink
    pub fn last_blink(&self) -> Option<Duration> {
        self.last_blink
    }
}

// =============================================================================
// TESTS
// =============================================================================
