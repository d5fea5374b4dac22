//! Per-frame input: corrected eye samples and raw face frames
//!
//! A `FaceFrame` is what a face tracker delivers (sensor orientation, zero or
//! more faces). An `EyeSample` is the single corrected confidence pair the
//! detector consumes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{BlinkError, Result};

/// One frame's eye closure confidences, already in the user's left/right
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EyeSample {
    /// Left eye closure confidence (0.0-1.0)
    pub left: f32,
    /// Right eye closure confidence (0.0-1.0)
    pub right: f32,
    /// Monotonic capture time (seconds since session start)
    pub timestamp_s: f64,
}

impl EyeSample {
    pub fn new(left: f32, right: f32, timestamp_s: f64) -> Self {
        Self { left, right, timestamp_s }
    }

    /// Capture time as a `Duration`; negative or non-finite reads as zero.
    ///
    /// Seconds are rounded to the nearest nanosecond, so cooldown spacing is
    /// measured on the rounded values: 1.3 s and 2.3 s are exactly 1 s apart
    /// here even though their raw `f64` difference is slightly below 1.0.
    pub fn timestamp(&self) -> Duration {
        Duration::try_from_secs_f64(self.timestamp_s).unwrap_or(Duration::ZERO)
    }
}

/// Blend-shape coefficients for one tracked face, in sensor orientation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaceBlendShapes {
    #[serde(default)]
    pub eye_blink_left: Option<f32>,
    #[serde(default)]
    pub eye_blink_right: Option<f32>,
}

/// A tracker frame: every face detected at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaceFrame {
    pub timestamp_s: f64,
    pub faces: Vec<FaceBlendShapes>,
}

impl FaceFrame {
    /// Reduce to a single eye sample.
    ///
    /// Only the first face is used; a frame without faces yields `None`.
    /// A missing coefficient reads as 0.0 (open). With `mirrored` (front
    /// camera) the sensor's left coefficient belongs to the user's right eye.
    pub fn to_sample(&self, mirrored: bool) -> Option<EyeSample> {
        let face = self.faces.first()?;
        let sensor_left = face.eye_blink_left.unwrap_or(0.0);
        let sensor_right = face.eye_blink_right.unwrap_or(0.0);

        let (left, right) = if mirrored {
            (sensor_right, sensor_left)
        } else {
            (sensor_left, sensor_right)
        };

        Some(EyeSample::new(left, right, self.timestamp_s))
    }
}

/// One line of replay input
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputLine {
    Frame(FaceFrame),
    Sample(EyeSample),
}

impl InputLine {
    /// Parse a JSON line (`line_no` is 1-based, for error reporting)
    pub fn parse(line_no: usize, text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|source| BlinkError::FrameParse {
            line: line_no,
            source,
        })
    }

    /// Eye sample for the detector, `None` if the frame had no face
    pub fn into_sample(self, mirrored: bool) -> Option<EyeSample> {
        match self {
            InputLine::Frame(frame) => frame.to_sample(mirrored),
            InputLine::Sample(sample) => Some(sample),
        }
    }
}
