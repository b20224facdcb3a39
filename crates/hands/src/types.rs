use {
    crate::InferError,
    serde::{Deserialize, Serialize},
};

/// Number of landmarks in a hand pose.
pub const HAND_LANDMARK_COUNT: usize = 21;

/// One detected key point.
///
/// `x` and `y` are normalized to the frame dimensions, `z` is depth relative
/// to the wrist, on roughly the same scale as `x`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Names for the hand pose landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexFingerMcp = 5,
    IndexFingerPip = 6,
    IndexFingerDip = 7,
    IndexFingerTip = 8,
    MiddleFingerMcp = 9,
    MiddleFingerPip = 10,
    MiddleFingerDip = 11,
    MiddleFingerTip = 12,
    RingFingerMcp = 13,
    RingFingerPip = 14,
    RingFingerDip = 15,
    RingFingerTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub const ALL: [HandLandmark; HAND_LANDMARK_COUNT] = [
        HandLandmark::Wrist,
        HandLandmark::ThumbCmc,
        HandLandmark::ThumbMcp,
        HandLandmark::ThumbIp,
        HandLandmark::ThumbTip,
        HandLandmark::IndexFingerMcp,
        HandLandmark::IndexFingerPip,
        HandLandmark::IndexFingerDip,
        HandLandmark::IndexFingerTip,
        HandLandmark::MiddleFingerMcp,
        HandLandmark::MiddleFingerPip,
        HandLandmark::MiddleFingerDip,
        HandLandmark::MiddleFingerTip,
        HandLandmark::RingFingerMcp,
        HandLandmark::RingFingerPip,
        HandLandmark::RingFingerDip,
        HandLandmark::RingFingerTip,
        HandLandmark::PinkyMcp,
        HandLandmark::PinkyPip,
        HandLandmark::PinkyDip,
        HandLandmark::PinkyTip,
    ];
}

impl From<HandLandmark> for usize {
    fn from(index: HandLandmark) -> usize {
        index as usize
    }
}

impl TryFrom<usize> for HandLandmark {
    type Error = String;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        HandLandmark::ALL.get(value).copied().ok_or_else(|| {
            format!(
                "Invalid hand landmark index: {}. Must be in range 0-{}.",
                value,
                HAND_LANDMARK_COUNT - 1
            )
        })
    }
}

/// One detected hand. Always exactly 21 landmarks, in `HandLandmark` order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hand {
    landmarks: [Landmark; HAND_LANDMARK_COUNT],
}

impl Hand {
    pub fn new(landmarks: [Landmark; HAND_LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    pub fn from_slice(landmarks: &[Landmark]) -> Result<Self, InferError> {
        let landmarks = landmarks.try_into().map_err(|_| {
            InferError::Shape(format!(
                "a hand needs {} landmarks, got {}",
                HAND_LANDMARK_COUNT,
                landmarks.len()
            ))
        })?;
        Ok(Self { landmarks })
    }

    pub fn landmark(&self, index: HandLandmark) -> &Landmark {
        &self.landmarks[usize::from(index)]
    }

    pub fn landmarks(&self) -> &[Landmark; HAND_LANDMARK_COUNT] {
        &self.landmarks
    }
}

/// All hands found in one frame. May be empty.
pub type Detections = Vec<Hand>;
