//! Video capture for the landmark pipeline.
//!
//! `CaptureDevice` is the per-session device contract. `VideoIn` implements it
//! on top of a blocking `VideoInDevice` backend driven from a worker thread.

mod error;
pub use error::*;

mod traits;
pub use traits::*;

mod videoin;
pub use videoin::*;
