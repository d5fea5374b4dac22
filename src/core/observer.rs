//! Blink observers
//!
//! The caller owns both the detector and the observer; the detector only
//! borrows the observer for the duration of one `update_with` call.

use serde::Serialize;

use crate::types::EyeBlink;

/// Receives blinks synchronously, inside the update that detected them
pub trait BlinkObserver {
    fn blink_detected(&mut self, blink: EyeBlink);
}

impl<F: FnMut(EyeBlink)> BlinkObserver for F {
    fn blink_detected(&mut self, blink: EyeBlink) {
        self(blink)
    }
}

/// Per-side blink tally
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BlinkCounter {
    pub left: u64,
    pub right: u64,
    pub both: u64,
}

impl BlinkCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total(&self) -> u64 {
        self.left + self.right + self.both
    }

    pub fn get(&self, blink: EyeBlink) -> u64 {
        match blink {
            EyeBlink::Left => self.left,
            EyeBlink::Right => self.right,
            EyeBlink::Both => self.both,
        }
    }
}

impl BlinkObserver for BlinkCounter {
    fn blink_detected(&mut self, blink: EyeBlink) {
        match blink {
            EyeBlink::Left => self.left += 1,
            EyeBlink::Right => self.right += 1,
            EyeBlink::Both => self.both += 1,
        }
    }
}
