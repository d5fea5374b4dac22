//! blinkgate: debounced eye-blink gesture detection
//!
//! Per-frame eye closure confidences → ThresholdClassifier → CooldownGate →
//! EyeBlinkDetector → at most one `EyeBlink` per frame.

pub mod core;
pub mod error;
pub mod types;

pub use error::{BlinkError, Result};

// =============================================================================
// DETECTOR DEFAULTS
// =============================================================================

/// Default sensitivity threshold (confidence strictly above this is "closed")
pub const DEFAULT_SENSITIVITY: f32 = 0.6;

/// Default cooldown between two emitted blinks (seconds)
pub const DEFAULT_COOL_DOWN_SECS: f64 = 1.0;

/// Recommended sensitivity range.
/// Detects natural blinks while ignoring half-closed eyes.
/// 0.3-0.4 also catches partial blinks but raises false positives,
/// 0.7+ requires a strong closure and feels unresponsive.
pub const RECOMMENDED_SENSITIVITY_MIN: f32 = 0.5;
pub const RECOMMENDED_SENSITIVITY_MAX: f32 = 0.6;

// =============================================================================
// VERSION
// =============================================================================

pub const VERSION: &str = "1.0.0";
