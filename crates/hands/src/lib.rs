//! Hand landmark detection.
//!
//! `HandDetector` is the contract the streaming loop runs against. The ONNX
//! backend (`HandLandmarker`) loads a MediaPipe-style landmark model once and
//! hands out per-session `HandTracker`s.

mod config;
pub use config::*;

mod detector;
pub use detector::*;

mod error;
pub use error::*;

mod landmarker;
pub use landmarker::*;

mod postprocess;

mod types;
pub use types::*;
