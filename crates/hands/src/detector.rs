use {
    crate::{Detections, InferError},
    image::Image,
    std::future::Future,
};

/// Hand landmark detector used by one streaming session.
///
/// Takes a packed RGB frame and returns every hand found in it.
pub trait HandDetector: Send {
    fn detect(
        &mut self,
        image: Image,
    ) -> impl Future<Output = Result<Detections, InferError>> + Send;
}
