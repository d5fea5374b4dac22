//! Core modules for blinkgate

pub mod threshold;
pub mod cooldown;
pub mod detector;
pub mod observer;
pub mod replay;
pub mod api;

pub use threshold::ThresholdClassifier;
pub use cooldown::{CooldownGate, GateCheck};
pub use detector::EyeBlinkDetector;
pub use observer::{BlinkCounter, BlinkObserver};
pub use replay::{replay, ReplaySummary};
pub use api::{create_router, router_with_state, run_server, AppState, BlinkNotice};
