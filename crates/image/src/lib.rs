//! Frame buffers for the capture pipeline.
//!
//! An `Image` is a packed pixel buffer tagged with its `PixelFormat`. Camera
//! formats (YUYV, MJPEG, BGR) are converted to packed RGB before inference.

mod error;
pub use error::*;

mod image;
pub use image::*;

mod pixelformat;
pub use pixelformat::*;

mod rgb;
pub use rgb::*;

mod transform;
