use std::time::Duration;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8765;
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(10);

/// Server and streaming loop settings.
#[derive(Clone, Debug, PartialEq)]
pub struct StreamConfig {
    host: String,
    port: u16,
    camera_index: usize,
    frame_delay: Duration,
    max_read_failures: Option<u32>,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            camera_index: 0,
            frame_delay: DEFAULT_FRAME_DELAY,
            max_read_failures: None,
        }
    }
}

impl StreamConfig {
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Capture device index, `/dev/video<index>` for V4L2.
    pub fn with_camera_index(mut self, camera_index: usize) -> Self {
        self.camera_index = camera_index;
        self
    }

    /// Pause after each sent message.
    pub fn with_frame_delay(mut self, frame_delay: Duration) -> Self {
        self.frame_delay = frame_delay;
        self
    }

    /// End the session after this many consecutive failed reads. `None`
    /// retries forever.
    pub fn with_max_read_failures(mut self, max_read_failures: Option<u32>) -> Self {
        self.max_read_failures = max_read_failures;
        self
    }

    // Getters
    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn camera_index(&self) -> usize {
        self.camera_index
    }

    pub fn frame_delay(&self) -> Duration {
        self.frame_delay
    }

    pub fn max_read_failures(&self) -> Option<u32> {
        self.max_read_failures
    }
}
