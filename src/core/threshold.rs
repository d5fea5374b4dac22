//! Threshold classifier: closure confidence → closed / open

/// Turns a per-eye closure confidence into a closed/open decision
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdClassifier {
    sensitivity: f32,
}

impl ThresholdClassifier {
    pub fn new(sensitivity: f32) -> Self {
        Self { sensitivity }
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// `confidence > sensitivity`, strictly: a value equal to the threshold is open.
    ///
    /// Input is clamped to [0, 1] first; NaN counts as 0.0.
    pub fn is_closed(&self, confidence: f32) -> bool {
        let confidence = if confidence.is_nan() {
            0.0
        } else {
            confidence.clamp(0.0, 1.0)
        };
        confidence > self.sensitivity
    }

    /// Classify a (left, right) pair
    pub fn classify(&self, left: f32, right: f32) -> (bool, bool) {
        (self.is_closed(left), self.is_closed(right))
    }
}
