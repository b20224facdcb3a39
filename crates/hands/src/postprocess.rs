use crate::*;

/// Raw landmark model outputs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RawLandmarks {
    /// 21 x (x, y, z) in model input pixels.
    pub points: Vec<f32>,
    /// Hand presence score in [0, 1].
    pub presence: f32,
}

/// Turn model outputs into detections.
///
/// Coordinates are divided by the model input size so x and y land in the
/// frame's normalized range. Nothing is rounded or clamped.
pub(crate) fn postprocess(
    raw: &RawLandmarks,
    input_size: usize,
    threshold: f32,
    max_hands: usize,
) -> Result<Detections, InferError> {
    if raw.points.len() != HAND_LANDMARK_COUNT * 3 {
        return Err(InferError::Shape(format!(
            "expected {} landmark coordinates, got {}",
            HAND_LANDMARK_COUNT * 3,
            raw.points.len()
        )));
    }

    if max_hands == 0 || raw.presence < threshold {
        return Ok(Vec::new());
    }

    let scale = input_size as f32;
    let landmarks: Vec<Landmark> = raw
        .points
        .chunks_exact(3)
        .map(|c| Landmark::new(c[0] / scale, c[1] / scale, c[2] / scale))
        .collect();

    Ok(vec![Hand::from_slice(&landmarks)?])
}
