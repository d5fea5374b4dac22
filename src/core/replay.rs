//! Replay recorded frames (JSON lines) through a detector

use serde::Serialize;
use std::io::BufRead;
use tracing::{debug, warn};

use crate::core::detector::EyeBlinkDetector;
use crate::core::observer::{BlinkCounter, BlinkObserver};
use crate::types::{BlinkDecision, InputLine};
use crate::Result;

/// What a replay saw
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Frames fed to the detector
    pub frames: u64,
    /// Face frames without a face
    pub skipped: u64,
    /// Lines that were not valid input
    pub malformed: u64,
    pub blinks: BlinkCounter,
}

/// Feed every line of `reader` to `detector`.
///
/// Blank lines are ignored, malformed lines are logged and counted, frames
/// without a face are counted as skipped. `on_decision` sees every decision.
pub fn replay<R, F>(
    reader: R,
    detector: &mut EyeBlinkDetector,
    mirrored: bool,
    mut on_decision: F,
) -> Result<ReplaySummary>
where
    R: BufRead,
    F: FnMut(&BlinkDecision),
{
    let mut summary = ReplaySummary::default();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let input = match InputLine::parse(idx + 1, line) {
            Ok(input) => input,
            Err(e) => {
                warn!("{}", e);
                summary.malformed += 1;
                continue;
            }
        };

        let Some(sample) = input.into_sample(mirrored) else {
            debug!(line = idx + 1, "no face in frame");
            summary.skipped += 1;
            continue;
        };

        let decision = detector.feed(&sample);
        summary.frames += 1;
        if let Some(blink) = decision.blink {
            summary.blinks.blink_detected(blink);
        }
        on_decision(&decision);
    }

    Ok(summary)
}
