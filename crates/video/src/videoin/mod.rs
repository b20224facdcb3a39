use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    std::{
        sync::{
            Arc,
            atomic::{AtomicBool, Ordering},
        },
        time::Duration,
    },
    tokio::{
        sync::{mpsc, oneshot},
        task::{JoinHandle, spawn_blocking},
    },
};

#[cfg(feature = "v4l2")]
mod v4l2;
#[cfg(feature = "v4l2")]
pub use v4l2::*;

// capacity of the video input channel
const CHANNEL_CAPACITY: usize = 4;

// delay before reconnecting after failure
const WAIT_BEFORE_RECONNECT: Duration = Duration::from_millis(100);

/// What the device actually delivers after negotiation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoInfo {
    pub size: Vec2<usize>,
    pub format: PixelFormat,
    pub frame_rate: f32,
}

/// Blocking camera backend, driven from a dedicated worker thread.
///
/// `open` must run on the same thread as `blocking_capture`, some backends
/// have thread affinity requirements.
pub trait VideoInDevice: Send {
    /// Open (or reopen) the device and return the negotiated format.
    fn open(&mut self) -> Result<VideoInfo, VideoError>;

    /// Close the device, if open.
    fn close(&mut self);

    /// Capture one frame.
    fn blocking_capture(&mut self) -> Result<Image, VideoError>;
}

/// Async capture device on top of a blocking backend.
///
/// Frames are pumped by a worker thread into a small channel. A capture error
/// is forwarded to the reader and the worker then reopens the backend, so
/// `read` keeps working across transient device failures. While the backend
/// cannot be reopened, each attempt shows up as one failed `read`.
///
/// `release` stops the worker, `wait_closed` waits for it to close the
/// backend.
pub struct VideoIn {
    device: Option<Box<dyn VideoInDevice>>,
    receiver: Option<mpsc::Receiver<Result<Image, VideoError>>>,
    cancel: Arc<AtomicBool>,
    info: Option<VideoInfo>,
    join_handle: Option<JoinHandle<()>>,
}

impl VideoIn {
    pub fn new(device: impl VideoInDevice + 'static) -> Self {
        Self {
            device: Some(Box::new(device)),
            receiver: None,
            cancel: Arc::new(AtomicBool::new(false)),
            info: None,
            join_handle: None,
        }
    }

    #[cfg(feature = "v4l2")]
    pub fn v4l2(config: V4l2Config) -> Self {
        Self::new(V4l2::new(config))
    }

    /// Negotiated format, available once open.
    pub fn info(&self) -> Option<VideoInfo> {
        self.info
    }
}

impl CaptureDevice for VideoIn {
    async fn open(&mut self) -> Result<(), VideoError> {
        let device = self
            .device
            .take()
            .ok_or_else(|| VideoError::Device("video input was already opened".to_string()))?;

        let (sender, receiver) = mpsc::channel(CHANNEL_CAPACITY);
        let (init_tx, init_rx) = oneshot::channel();
        let cancel = Arc::clone(&self.cancel);

        let join_handle = spawn_blocking(move || run_worker(device, sender, cancel, init_tx));

        let info = init_rx
            .await
            .map_err(|_| VideoError::Device("Worker thread died during init".to_string()))??;

        log::info!(
            "Camera opened: {} {:?} @ {:.1} fps",
            info.size,
            info.format,
            info.frame_rate
        );

        self.receiver = Some(receiver);
        self.info = Some(info);
        self.join_handle = Some(join_handle);
        Ok(())
    }

    async fn read(&mut self) -> Result<Image, VideoError> {
        let receiver = self.receiver.as_mut().ok_or(VideoError::Closed)?;
        match receiver.recv().await {
            Some(result) => result,
            None => Err(VideoError::Closed),
        }
    }

    fn release(&mut self) {
        self.cancel.store(true, Ordering::Relaxed);
        // dropping the receiver unblocks a worker waiting in blocking_send
        self.receiver.take();
        self.device.take();
    }

    async fn wait_closed(&mut self) {
        if let Some(join_handle) = self.join_handle.take() {
            if let Err(e) = join_handle.await {
                log::error!("video worker failed: {e}");
            }
        }
    }
}

impl Drop for VideoIn {
    // the worker is detached here and closes the device on its own
    fn drop(&mut self) {
        self.release();
    }
}

fn run_worker(
    mut device: Box<dyn VideoInDevice>,
    sender: mpsc::Sender<Result<Image, VideoError>>,
    cancel: Arc<AtomicBool>,
    init_tx: oneshot::Sender<Result<VideoInfo, VideoError>>,
) {
    match device.open() {
        Ok(info) => {
            let _ = init_tx.send(Ok(info));
        }
        Err(error) => {
            let _ = init_tx.send(Err(error));
            return;
        }
    }

    while !cancel.load(Ordering::Relaxed) {
        match device.blocking_capture() {
            Ok(frame) => {
                if sender.blocking_send(Ok(frame)).is_err() {
                    break; // reader released the device
                }
            }
            Err(error) => {
                log::warn!("video worker: capture failed: {}", error);
                if sender.blocking_send(Err(error)).is_err() {
                    break;
                }
                device.close();
                if !reopen(device.as_mut(), &sender, &cancel) {
                    break;
                }
            }
        }
    }

    device.close();
    log::info!("Camera released.");
}

/// Reopen after a capture failure. Every failed attempt is forwarded to the
/// reader, so a device that is gone for good keeps producing errors. Returns
/// `false` once released.
fn reopen(
    device: &mut dyn VideoInDevice,
    sender: &mpsc::Sender<Result<Image, VideoError>>,
    cancel: &AtomicBool,
) -> bool {
    loop {
        if cancel.load(Ordering::Relaxed) || sender.is_closed() {
            return false;
        }
        std::thread::sleep(WAIT_BEFORE_RECONNECT);
        log::info!("video worker: reconnecting...");
        match device.open() {
            Ok(_) => return true,
            Err(error) => {
                log::debug!("video worker: reopen failed: {}", error);
                if sender.blocking_send(Err(error)).is_err() {
                    return false;
                }
            }
        }
    }
}
