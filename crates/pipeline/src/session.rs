use {
    crate::{SessionError, StreamConfig, wire},
    com::MessageSink,
    hands::HandDetector,
    image::{Image, ImageError},
    tokio::sync::watch,
    video::{CaptureDevice, VideoError},
};

/// Lifecycle of one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Opening,
    Streaming,
    Closing,
}

/// How a session ended without error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEnd {
    /// The client went away.
    Disconnected,
    /// The server is shutting down.
    Shutdown,
}

/// Owns a capture device and releases it exactly once, either through
/// `release`/`close` or when dropped. Only `close` waits for the device to
/// be closed.
pub struct CaptureGuard<C: CaptureDevice> {
    device: C,
    released: bool,
}

impl<C: CaptureDevice> CaptureGuard<C> {
    pub fn new(device: C) -> Self {
        Self {
            device,
            released: false,
        }
    }

    pub async fn open(&mut self) -> Result<(), VideoError> {
        self.device.open().await
    }

    pub async fn read(&mut self) -> Result<Image, VideoError> {
        self.device.read().await
    }

    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.device.release();
        }
    }

    /// Release the device and wait until it is closed, so the next session
    /// can open it again.
    pub async fn close(&mut self) {
        self.release();
        self.device.wait_closed().await;
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl<C: CaptureDevice> Drop for CaptureGuard<C> {
    fn drop(&mut self) {
        self.release();
    }
}

fn enter(state: SessionState) {
    log::debug!("Session state: {state:?}");
}

/// Run the streaming loop for one client until it disconnects, a fatal error
/// occurs or `shutdown` turns true.
///
/// The capture device is released exactly once on every exit path, including
/// when the returned future is dropped.
pub async fn run_session<C, D, S>(
    capture: C,
    detector: &mut D,
    sink: &mut S,
    config: &StreamConfig,
    mut shutdown: watch::Receiver<bool>,
) -> Result<SessionEnd, SessionError>
where
    C: CaptureDevice,
    D: HandDetector,
    S: MessageSink,
{
    let mut capture = CaptureGuard::new(capture);

    enter(SessionState::Opening);
    let result = match capture.open().await {
        Ok(()) => {
            enter(SessionState::Streaming);
            stream(&mut capture, detector, sink, config, &mut shutdown).await
        }
        Err(e) => {
            log::error!("Failed to open camera: {e}");
            Err(SessionError::DeviceOpen(e))
        }
    };

    enter(SessionState::Closing);
    capture.close().await;
    result
}

async fn stream<C, D, S>(
    capture: &mut CaptureGuard<C>,
    detector: &mut D,
    sink: &mut S,
    config: &StreamConfig,
    shutdown: &mut watch::Receiver<bool>,
) -> Result<SessionEnd, SessionError>
where
    C: CaptureDevice,
    D: HandDetector,
    S: MessageSink,
{
    let mut failures = 0u32;
    loop {
        let frame = tokio::select! {
            biased;
            _ = shutdown_requested(shutdown) => return Ok(SessionEnd::Shutdown),
            frame = capture.read() => frame,
        };

        let image = match frame.and_then(|frame| prepare(&frame).map_err(VideoError::from)) {
            Ok(image) => {
                failures = 0;
                image
            }
            Err(e) => {
                failures += 1;
                log::warn!("Ignoring empty camera frame: {e}");
                if config
                    .max_read_failures()
                    .is_some_and(|max| failures >= max)
                {
                    return Err(SessionError::ReadFailures(failures));
                }
                tokio::task::yield_now().await;
                continue;
            }
        };

        let hands = detector.detect(image).await?;
        let message = wire::encode(&hands)?;

        match sink.send_text(message).await {
            Ok(()) => {}
            Err(e) if e.is_closed() => return Ok(SessionEnd::Disconnected),
            Err(e) => return Err(SessionError::Send(e)),
        }

        tokio::select! {
            biased;
            _ = shutdown_requested(shutdown) => return Ok(SessionEnd::Shutdown),
            _ = tokio::time::sleep(config.frame_delay()) => {}
        }
    }
}

/// Convert a captured frame to packed RGB and mirror it into a selfie view.
fn prepare(frame: &Image) -> Result<Image, ImageError> {
    frame.to_rgb()?.flip_horizontal()
}

/// Resolves once shutdown is requested. Pends forever if the sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let requested = shutdown.wait_for(|&stop| stop).await.is_ok();
    if !requested {
        std::future::pending::<()>().await;
    }
}
