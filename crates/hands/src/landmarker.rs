use {
    crate::{
        postprocess::{RawLandmarks, postprocess},
        *,
    },
    base::Vec2,
    image::{Image, PixelFormat},
    ndarray::ArrayD,
    ort::{inputs, session::Session, value::TensorRef},
    std::{
        fmt,
        path::Path,
        sync::{Arc, Mutex},
    },
};

/// Side length of the square landmark model input.
pub const LANDMARK_INPUT_SIZE: usize = 224;

/// The landmark model sees one crop per frame, so it reports one hand.
pub const MAX_TRACKED_HANDS: usize = 1;

/// ONNX hand landmark model, loaded once per process.
///
/// The model takes a `[1, 224, 224, 3]` RGB tensor in `[0, 1]` and produces 63
/// screen coordinates (output 0) and a hand presence score (output 1). Each
/// session gets its own `HandTracker` through `tracker`; trackers share the
/// loaded model and keep their own tracking state.
pub struct HandLandmarker {
    model: Arc<LandmarkModel>,
    config: HandsConfig,
}

/// Loaded session plus the tensor names it is driven with.
struct LandmarkModel {
    session: Mutex<Session>,
    input_name: String,
    landmarks_name: String,
    presence_name: String,
}

impl fmt::Debug for HandLandmarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandLandmarker")
            .field("config", &self.config)
            .finish()
    }
}

impl HandLandmarker {
    pub fn from_file(
        model_path: impl AsRef<Path>,
        config: HandsConfig,
    ) -> Result<Self, InferError> {
        config.validate()?;
        if config.max_hands() > MAX_TRACKED_HANDS {
            return Err(InferError::Config(format!(
                "the landmark model tracks at most {MAX_TRACKED_HANDS} hand, max_hands is {}",
                config.max_hands()
            )));
        }
        let path = model_path.as_ref();
        let session = Session::builder()
            .map_err(|e| InferError::Runtime(format!("failed to create session builder: {e}")))?
            .commit_from_file(path)
            .map_err(|e| {
                InferError::Runtime(format!(
                    "failed to load model from {}: {e}",
                    path.display()
                ))
            })?;

        let input_name = session
            .inputs()
            .first()
            .map(|input| input.name().to_string())
            .ok_or_else(|| InferError::Shape("landmark model has no inputs".to_string()))?;
        let output_names: Vec<String> = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();
        let [landmarks_name, presence_name] = match output_names.as_slice() {
            [landmarks, presence, ..] => [landmarks.clone(), presence.clone()],
            _ => {
                return Err(InferError::Shape(format!(
                    "landmark model needs at least 2 outputs, has {}",
                    output_names.len()
                )));
            }
        };
        log::info!("Hand landmark model loaded from {}", path.display());

        Ok(Self {
            model: Arc::new(LandmarkModel {
                session: Mutex::new(session),
                input_name,
                landmarks_name,
                presence_name,
            }),
            config,
        })
    }

    /// Detector for one session, starting with no hand tracked.
    pub fn tracker(&self) -> HandTracker {
        HandTracker {
            model: Arc::clone(&self.model),
            config: self.config.clone(),
            tracking: false,
        }
    }
}

/// Per-session view of a `HandLandmarker`.
pub struct HandTracker {
    model: Arc<LandmarkModel>,
    config: HandsConfig,
    tracking: bool,
}

impl HandDetector for HandTracker {
    async fn detect(&mut self, image: Image) -> Result<Detections, InferError> {
        let model = Arc::clone(&self.model);
        let raw = tokio::task::spawn_blocking(move || run_model(&model, &image))
            .await
            .map_err(|e| InferError::Runtime(format!("inference task failed: {e}")))??;

        let threshold = self.config.presence_threshold(self.tracking);
        let hands = postprocess(
            &raw,
            LANDMARK_INPUT_SIZE,
            threshold,
            self.config.max_hands(),
        )?;
        self.tracking = !hands.is_empty();
        Ok(hands)
    }
}

/// Resize an RGB frame to the model input and scale it to `[0, 1]`, NHWC.
fn preprocess(image: &Image) -> Result<ArrayD<f32>, InferError> {
    image.format.ensure_format(PixelFormat::Rgb8)?;
    let resized = image.resize(Vec2::new(LANDMARK_INPUT_SIZE, LANDMARK_INPUT_SIZE))?;
    let data = resized.data.iter().map(|&v| v as f32 / 255.0).collect();
    ArrayD::from_shape_vec(
        vec![1, LANDMARK_INPUT_SIZE, LANDMARK_INPUT_SIZE, 3],
        data,
    )
    .map_err(|e| InferError::Shape(format!("failed to create input array: {e}")))
}

fn run_model(model: &LandmarkModel, image: &Image) -> Result<RawLandmarks, InferError> {
    let input = preprocess(image)?;
    let tensor = TensorRef::from_array_view(input.view())
        .map_err(|e| InferError::Runtime(format!("failed to create tensor ref: {e}")))?;

    let mut session = model
        .session
        .lock()
        .map_err(|_| InferError::Runtime("landmark session lock poisoned".to_string()))?;
    let outputs = session
        .run(inputs![model.input_name.as_str() => tensor])
        .map_err(|e| InferError::Runtime(format!("inference failed: {e}")))?;

    let points = outputs[model.landmarks_name.as_str()]
        .try_extract_array::<f32>()
        .map_err(|e| InferError::Shape(format!("landmark output is not f32: {e}")))?
        .iter()
        .copied()
        .collect();
    let presence = outputs[model.presence_name.as_str()]
        .try_extract_array::<f32>()
        .map_err(|e| InferError::Shape(format!("presence output is not f32: {e}")))?
        .iter()
        .next()
        .copied()
        .ok_or_else(|| InferError::Shape("presence output is empty".to_string()))?;

    Ok(RawLandmarks { points, presence })
}
