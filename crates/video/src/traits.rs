use {crate::VideoError, image::Image, std::future::Future};

/// A capture device owned by one streaming session.
///
/// The device is acquired with `open`, polled with `read`, and given back with
/// `release`. A failed `read` concerns one frame only; the device stays usable
/// and the caller may read again.
pub trait CaptureDevice: Send {
    /// Acquire the device.
    fn open(&mut self) -> impl Future<Output = Result<(), VideoError>> + Send;

    /// Wait for the next frame.
    fn read(&mut self) -> impl Future<Output = Result<Image, VideoError>> + Send;

    /// Give the device back. Calling this more than once, or before a
    /// successful `open`, is a no-op.
    ///
    /// This only starts the release. Await `wait_closed` before opening the
    /// same device again.
    fn release(&mut self);

    /// Resolve once a released device is actually closed.
    fn wait_closed(&mut self) -> impl Future<Output = ()> + Send {
        std::future::ready(())
    }
}
