//! JSON wire format: an array of hands, each an array of 21 `{"x","y","z"}`
//! objects. No hands is `[]`.

use hands::{Detections, Hand};

pub fn encode(hands: &[Hand]) -> Result<String, serde_json::Error> {
    serde_json::to_string(hands)
}

/// Parse a message. Hands without exactly 21 points are rejected.
pub fn decode(text: &str) -> Result<Detections, serde_json::Error> {
    serde_json::from_str(text)
}
