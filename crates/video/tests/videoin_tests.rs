use base::Vec2;
use image::{Image, PixelFormat};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use tokio::time::{Duration, sleep, timeout};
use video::{CaptureDevice, VideoError, VideoIn, VideoInDevice, VideoInfo};

#[derive(Clone, Default)]
struct Counters {
    opens: Arc<AtomicUsize>,
    closes: Arc<AtomicUsize>,
    captures: Arc<AtomicUsize>,
}

/// Blocking fake backend. Capture number `fail_at` (1-based) fails once,
/// every capture from `fail_from` on fails. With `fail_reopen` only the first
/// open succeeds.
struct FakeDevice {
    counters: Counters,
    fail_open: bool,
    fail_reopen: bool,
    fail_at: Option<usize>,
    fail_from: Option<usize>,
    capture_time: std::time::Duration,
}

impl FakeDevice {
    fn new(counters: Counters) -> Self {
        Self {
            counters,
            fail_open: false,
            fail_reopen: false,
            fail_at: None,
            fail_from: None,
            capture_time: std::time::Duration::from_millis(1),
        }
    }
}

impl VideoInDevice for FakeDevice {
    fn open(&mut self) -> Result<VideoInfo, VideoError> {
        let n = self.counters.opens.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_open || (self.fail_reopen && n > 1) {
            return Err(VideoError::Device("no such device".to_string()));
        }
        Ok(VideoInfo {
            size: Vec2::new(2, 1),
            format: PixelFormat::Rgb8,
            frame_rate: 30.0,
        })
    }

    fn close(&mut self) {
        self.counters.closes.fetch_add(1, Ordering::SeqCst);
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        let n = self.counters.captures.fetch_add(1, Ordering::SeqCst) + 1;
        std::thread::sleep(self.capture_time);
        if Some(n) == self.fail_at || self.fail_from.is_some_and(|from| n >= from) {
            return Err(VideoError::Stream("select timeout".to_string()));
        }
        Ok(Image::new(
            Vec2::new(2, 1),
            vec![n as u8; 6],
            PixelFormat::Rgb8,
        ))
    }
}

#[tokio::test]
async fn test_videoin_open_reports_info() {
    let counters = Counters::default();
    let mut video = VideoIn::new(FakeDevice::new(counters.clone()));
    assert!(video.info().is_none());

    video.open().await.expect("open failed");

    let info = video.info().unwrap();
    assert_eq!(info.size, Vec2::new(2, 1));
    assert_eq!(info.format, PixelFormat::Rgb8);
    assert_eq!(counters.opens.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_videoin_frames_arrive_in_capture_order() {
    let counters = Counters::default();
    let mut video = VideoIn::new(FakeDevice::new(counters));
    video.open().await.unwrap();

    let mut previous = 0u8;
    for _ in 0..5 {
        let frame = video.read().await.unwrap();
        assert!(frame.data[0] > previous);
        previous = frame.data[0];
    }
}

#[tokio::test]
async fn test_videoin_open_failure_is_reported() {
    let counters = Counters::default();
    let mut device = FakeDevice::new(counters);
    device.fail_open = true;
    let mut video = VideoIn::new(device);

    let result = video.open().await;
    assert!(matches!(result, Err(VideoError::Device(_))));

    // no frames without an open device
    assert!(matches!(video.read().await, Err(VideoError::Closed)));
}

#[tokio::test]
async fn test_videoin_open_twice_fails() {
    let mut video = VideoIn::new(FakeDevice::new(Counters::default()));
    video.open().await.unwrap();
    assert!(matches!(video.open().await, Err(VideoError::Device(_))));
}

#[tokio::test]
async fn test_videoin_capture_failure_is_forwarded_then_recovers() {
    let counters = Counters::default();
    let mut device = FakeDevice::new(counters.clone());
    device.fail_at = Some(2);
    let mut video = VideoIn::new(device);
    video.open().await.unwrap();

    assert!(video.read().await.is_ok());
    assert!(matches!(video.read().await, Err(VideoError::Stream(_))));

    // worker reopens the device and keeps pumping
    let frame = timeout(Duration::from_secs(5), video.read())
        .await
        .expect("read timed out");
    assert!(frame.is_ok());
    assert_eq!(counters.opens.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_videoin_lost_device_keeps_failing_reads() {
    let counters = Counters::default();
    let mut device = FakeDevice::new(counters.clone());
    device.fail_from = Some(2);
    device.fail_reopen = true;
    let mut video = VideoIn::new(device);
    video.open().await.unwrap();

    assert!(video.read().await.is_ok());

    let mut failures = 0;
    while failures < 3 {
        let frame = timeout(Duration::from_secs(5), video.read())
            .await
            .expect("read timed out");
        assert!(frame.is_err());
        failures += 1;
    }
    assert!(counters.opens.load(Ordering::SeqCst) >= 3);
}

#[tokio::test]
async fn test_videoin_wait_closed_returns_after_device_close() {
    let counters = Counters::default();
    let mut device = FakeDevice::new(counters.clone());
    device.capture_time = std::time::Duration::from_millis(33);
    let mut video = VideoIn::new(device);
    video.open().await.unwrap();
    video.read().await.unwrap();

    video.release();
    video.wait_closed().await;
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
    assert!(matches!(video.read().await, Err(VideoError::Closed)));

    // idempotent
    video.release();
    video.wait_closed().await;
    drop(video);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_videoin_drop_closes_device_in_background() {
    let counters = Counters::default();
    let mut video = VideoIn::new(FakeDevice::new(counters.clone()));
    video.open().await.unwrap();
    video.read().await.unwrap();
    drop(video);

    for _ in 0..250 {
        if counters.closes.load(Ordering::SeqCst) == 1 {
            return;
        }
        sleep(Duration::from_millis(20)).await;
    }
    panic!("device was not closed after drop");
}

#[tokio::test]
async fn test_videoin_release_before_open_is_noop() {
    let counters = Counters::default();
    let mut video = VideoIn::new(FakeDevice::new(counters.clone()));
    video.release();
    video.wait_closed().await;

    assert_eq!(counters.opens.load(Ordering::SeqCst), 0);
    assert_eq!(counters.closes.load(Ordering::SeqCst), 0);
}
