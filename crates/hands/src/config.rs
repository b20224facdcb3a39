use crate::InferError;

/// Detector options.
#[derive(Clone, Debug, PartialEq)]
pub struct HandsConfig {
    streaming_mode: bool,
    max_hands: usize,
    min_detection_confidence: f32,
    min_tracking_confidence: f32,
}

impl Default for HandsConfig {
    fn default() -> Self {
        Self {
            streaming_mode: true,
            max_hands: 1,
            min_detection_confidence: 0.7,
            min_tracking_confidence: 0.5,
        }
    }
}

impl HandsConfig {
    /// Treat frames as a video sequence rather than unrelated stills. In
    /// streaming mode a hand seen in the previous frame is kept with the
    /// tracking threshold instead of the detection threshold.
    pub fn with_streaming_mode(mut self, streaming_mode: bool) -> Self {
        self.streaming_mode = streaming_mode;
        self
    }

    /// Cap on simultaneously reported hands. `HandLandmarker` supports at
    /// most `MAX_TRACKED_HANDS` and rejects larger values when loading.
    pub fn with_max_hands(mut self, max_hands: usize) -> Self {
        self.max_hands = max_hands;
        self
    }

    /// Score needed to accept a new hand.
    pub fn with_min_detection_confidence(mut self, confidence: f32) -> Self {
        self.min_detection_confidence = confidence;
        self
    }

    /// Score needed to keep tracking a hand from the previous frame.
    pub fn with_min_tracking_confidence(mut self, confidence: f32) -> Self {
        self.min_tracking_confidence = confidence;
        self
    }

    pub fn validate(&self) -> Result<(), InferError> {
        for (name, value) in [
            ("min_detection_confidence", self.min_detection_confidence),
            ("min_tracking_confidence", self.min_tracking_confidence),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(InferError::Config(format!(
                    "{name} must be in [0, 1], got {value}"
                )));
            }
        }
        Ok(())
    }

    // Getters
    pub fn streaming_mode(&self) -> bool {
        self.streaming_mode
    }

    pub fn max_hands(&self) -> usize {
        self.max_hands
    }

    pub fn min_detection_confidence(&self) -> f32 {
        self.min_detection_confidence
    }

    pub fn min_tracking_confidence(&self) -> f32 {
        self.min_tracking_confidence
    }

    /// Presence threshold for the next frame, given whether the previous
    /// frame had a hand.
    pub fn presence_threshold(&self, tracking: bool) -> f32 {
        if self.streaming_mode && tracking {
            self.min_tracking_confidence
        } else {
            self.min_detection_confidence
        }
    }
}
