use {
    anyhow::Context,
    base::log,
    hands::{HandLandmarker, HandTracker, HandsConfig, InferError},
    pipeline::{Acceptor, SessionFactory, StreamConfig},
    video::{V4l2Config, VideoIn},
};

const MODEL_PATH: &str = "models/hand_landmark.onnx";

/// Camera plus a tracker over the shared landmark model, per client.
struct CameraHands {
    landmarker: HandLandmarker,
}

impl SessionFactory for CameraHands {
    type Capture = VideoIn;
    type Detector = HandTracker;

    fn capture(&self, config: &StreamConfig) -> VideoIn {
        VideoIn::v4l2(V4l2Config::new(config.camera_index()))
    }

    fn detector(&self) -> Result<HandTracker, InferError> {
        Ok(self.landmarker.tracker())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    base::init_stdout_logger();

    let landmarker = HandLandmarker::from_file(MODEL_PATH, HandsConfig::default())
        .with_context(|| format!("loading {MODEL_PATH}"))?;
    let config = StreamConfig::default();
    let acceptor = Acceptor::bind(config.clone(), CameraHands { landmarker })
        .await
        .with_context(|| format!("binding {}:{}", config.host(), config.port()))?;

    acceptor
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                log::error!("Failed to listen for Ctrl-C: {e}");
                std::future::pending::<()>().await;
            }
        })
        .await;

    log::info!("Server stopped by user.");
    Ok(())
}
