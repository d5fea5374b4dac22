//! Core types for blinkgate

mod blink;
mod config;
mod output;
mod reason;
mod sample;

pub use blink::{DetectorPhase, EyeBlink};
pub use config::{DetectorConfig, DetectorConfigBuilder};
pub use output::BlinkDecision;
pub use reason::DecisionReason;
pub use sample::{EyeSample, FaceBlendShapes, FaceFrame, InputLine};
