#![allow(dead_code)]

use {
    base::Vec2,
    com::{ComError, MessageSink},
    hands::{Detections, HAND_LANDMARK_COUNT, Hand, HandDetector, InferError, Landmark},
    image::{Image, PixelFormat},
    std::{
        collections::VecDeque,
        io,
        sync::{
            Arc, Mutex,
            atomic::{AtomicUsize, Ordering},
        },
        time::{Duration, Instant},
    },
    tokio::sync::mpsc,
    video::{CaptureDevice, VideoError, VideoInDevice, VideoInfo},
};

pub fn rgb_frame() -> Image {
    Image::new(Vec2::new(2, 1), vec![1, 2, 3, 4, 5, 6], PixelFormat::Rgb8)
}

/// Hand whose landmark `i` is `(marker + i / 100, 0.5, -0.01 * i)`.
pub fn hand(marker: f32) -> Hand {
    let landmarks: Vec<Landmark> = (0..HAND_LANDMARK_COUNT)
        .map(|i| Landmark::new(marker + i as f32 / 100.0, 0.5, -0.01 * i as f32))
        .collect();
    Hand::from_slice(&landmarks).unwrap()
}

#[derive(Default)]
pub struct CaptureStats {
    pub opens: AtomicUsize,
    pub reads: AtomicUsize,
    pub releases: AtomicUsize,
}

impl CaptureStats {
    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

pub enum Step {
    Frame(Image),
    Fail,
}

/// Scripted capture device. Once the script runs out it either repeats a
/// frame forever or waits forever.
pub struct MockCapture {
    steps: VecDeque<Step>,
    repeat: Option<Image>,
    fail_open: bool,
    stats: Arc<CaptureStats>,
}

impl MockCapture {
    pub fn new(steps: Vec<Step>) -> (Self, Arc<CaptureStats>) {
        let stats = Arc::new(CaptureStats::default());
        let capture = Self {
            steps: steps.into(),
            repeat: None,
            fail_open: false,
            stats: Arc::clone(&stats),
        };
        (capture, stats)
    }

    pub fn frames(count: usize) -> (Self, Arc<CaptureStats>) {
        Self::new((0..count).map(|_| Step::Frame(rgb_frame())).collect())
    }

    pub fn endless(stats: Arc<CaptureStats>) -> Self {
        Self {
            steps: VecDeque::new(),
            repeat: Some(rgb_frame()),
            fail_open: false,
            stats,
        }
    }

    pub fn failing_open() -> (Self, Arc<CaptureStats>) {
        let (mut capture, stats) = Self::new(vec![Step::Frame(rgb_frame())]);
        capture.fail_open = true;
        (capture, stats)
    }
}

impl CaptureDevice for MockCapture {
    async fn open(&mut self) -> Result<(), VideoError> {
        self.stats.opens.fetch_add(1, Ordering::SeqCst);
        if self.fail_open {
            Err(VideoError::Device("camera busy".to_string()))
        } else {
            Ok(())
        }
    }

    async fn read(&mut self) -> Result<Image, VideoError> {
        self.stats.reads.fetch_add(1, Ordering::SeqCst);
        match self.steps.pop_front() {
            Some(Step::Frame(image)) => Ok(image),
            Some(Step::Fail) => Err(VideoError::Stream("no frame".to_string())),
            None => match &self.repeat {
                Some(image) => Ok(image.clone()),
                None => std::future::pending().await,
            },
        }
    }

    fn release(&mut self) {
        self.stats.releases.fetch_add(1, Ordering::SeqCst);
    }
}

/// Detector returning scripted results, then no hands. Records its inputs.
#[derive(Default)]
pub struct MockDetector {
    results: VecDeque<Result<Detections, InferError>>,
    pub seen: Arc<Mutex<Vec<Image>>>,
}

impl MockDetector {
    pub fn new(results: Vec<Result<Detections, InferError>>) -> Self {
        Self {
            results: results.into(),
            seen: Arc::default(),
        }
    }
}

impl HandDetector for MockDetector {
    async fn detect(&mut self, image: Image) -> Result<Detections, InferError> {
        self.seen.lock().unwrap().push(image);
        self.results.pop_front().unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub enum SinkFailure {
    Closed,
    Other,
}

/// Sink forwarding every message, with its send time, to a channel. Can be
/// told to fail after a number of successful sends.
pub struct MockSink {
    tx: mpsc::UnboundedSender<(Instant, String)>,
    sent: usize,
    fail_after: Option<(usize, SinkFailure)>,
}

impl MockSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<(Instant, String)>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let sink = Self {
            tx,
            sent: 0,
            fail_after: None,
        };
        (sink, rx)
    }

    pub fn failing_after(
        count: usize,
        failure: SinkFailure,
    ) -> (Self, mpsc::UnboundedReceiver<(Instant, String)>) {
        let (mut sink, rx) = Self::new();
        sink.fail_after = Some((count, failure));
        (sink, rx)
    }
}

impl MessageSink for MockSink {
    async fn send_text(&mut self, text: String) -> Result<(), ComError> {
        if let Some((count, failure)) = &self.fail_after {
            if self.sent >= *count {
                return Err(match failure {
                    SinkFailure::Closed => ComError::ConnectionClosed,
                    SinkFailure::Other => {
                        ComError::Io(io::Error::new(io::ErrorKind::Other, "buffer full"))
                    }
                });
            }
        }
        self.sent += 1;
        let _ = self.tx.send((Instant::now(), text));
        Ok(())
    }
}

#[derive(Default)]
pub struct CameraStats {
    pub opens: AtomicUsize,
    pub closes: AtomicUsize,
}

/// Blocking camera backend for `VideoIn`. Captures from `fail_from` (1-based)
/// on fail, and once it failed it can never be reopened. `closes` counts
/// closes of an open camera.
pub struct FakeCamera {
    stats: Arc<CameraStats>,
    is_open: bool,
    captures: usize,
    fail_from: Option<usize>,
    capture_time: Duration,
}

impl FakeCamera {
    pub fn new(fail_from: Option<usize>, capture_time: Duration) -> (Self, Arc<CameraStats>) {
        let stats = Arc::new(CameraStats::default());
        let camera = Self {
            stats: Arc::clone(&stats),
            is_open: false,
            captures: 0,
            fail_from,
            capture_time,
        };
        (camera, stats)
    }
}

impl VideoInDevice for FakeCamera {
    fn open(&mut self) -> Result<VideoInfo, VideoError> {
        if self.stats.opens.fetch_add(1, Ordering::SeqCst) > 0 {
            return Err(VideoError::Device("camera unplugged".to_string()));
        }
        self.is_open = true;
        Ok(VideoInfo {
            size: Vec2::new(2, 1),
            format: PixelFormat::Rgb8,
            frame_rate: 30.0,
        })
    }

    fn close(&mut self) {
        if self.is_open {
            self.is_open = false;
            self.stats.closes.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        self.captures += 1;
        std::thread::sleep(self.capture_time);
        if self.fail_from.is_some_and(|from| self.captures >= from) {
            return Err(VideoError::Stream("select timeout".to_string()));
        }
        Ok(rgb_frame())
    }
}
