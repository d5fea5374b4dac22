//! Cooldown gate: has the debounce window since the last blink elapsed?
//!
//! The gate holds only the window length. The last-blink timestamp belongs to
//! the detector, which decides when to commit it.

use std::time::Duration;

/// Result of checking the gate at a given time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateCheck {
    /// No previous blink, or the window has elapsed
    Open,
    /// Still inside the window; carries the time left
    Cooling(Duration),
    /// `now` is earlier than the last blink
    Regressed,
}

/// Debounce window between emitted blinks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownGate {
    cool_down: Duration,
}

impl CooldownGate {
    pub fn new(cool_down: Duration) -> Self {
        Self { cool_down }
    }

    pub fn cool_down(&self) -> Duration {
        self.cool_down
    }

    /// Check the gate at `now` given the last emitted blink
    pub fn check(&self, now: Duration, last_blink: Option<Duration>) -> GateCheck {
        let Some(last) = last_blink else {
            return GateCheck::Open;
        };
        match now.checked_sub(last) {
            None => GateCheck::Regressed,
            Some(elapsed) if elapsed >= self.cool_down => GateCheck::Open,
            Some(elapsed) => GateCheck::Cooling(self.cool_down - elapsed),
        }
    }

    /// True iff there is no last blink or `now - last >= cool_down`
    pub fn is_open(&self, now: Duration, last_blink: Option<Duration>) -> bool {
        self.check(now, last_blink) == GateCheck::Open
    }
}
