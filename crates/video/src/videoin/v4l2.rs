use {
    crate::*,
    base::Vec2,
    image::{Image, PixelFormat},
    v4l::{
        Device, Format, FourCC, buffer::Type, io::mmap::Stream as MmapStream,
        io::traits::CaptureStream, video::Capture,
    },
};

#[derive(Debug, Clone)]
pub struct V4l2Config {
    /// Opens `/dev/video<index>`.
    pub index: usize,
    pub size: Option<Vec2<usize>>,
    pub format: Option<PixelFormat>,
    pub frame_rate: Option<f32>,
}

impl V4l2Config {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            size: None,
            format: None,
            frame_rate: None,
        }
    }
}

pub(crate) struct V4l2 {
    config: V4l2Config,
    stream: Option<MmapStream<'static>>,
    size: Vec2<usize>,
    format: PixelFormat,
}

impl V4l2 {
    pub fn new(config: V4l2Config) -> Self {
        Self {
            config,
            stream: None,
            size: Vec2::new(0, 0),
            format: PixelFormat::Yuyv,
        }
    }
}

impl VideoInDevice for V4l2 {
    fn open(&mut self) -> Result<VideoInfo, VideoError> {
        // close stream
        self.stream.take();

        let device = Device::new(self.config.index).map_err(|error| {
            VideoError::Device(format!(
                "cannot open /dev/video{}: {}",
                self.config.index, error
            ))
        })?;
        let device_format = Capture::format(&device)?;

        // build size
        let desired_size = match self.config.size {
            Some(size) => size,
            None => Vec2::new(device_format.width as usize, device_format.height as usize),
        };

        // build pixel format
        let desired_fourcc = match self.config.format {
            Some(format) => FourCC::new(&format.as_fourcc().to_le_bytes()),
            None => device_format.fourcc,
        };

        // set the format and get the actual format back
        let actual_format = Capture::set_format(
            &device,
            &Format::new(desired_size.x as u32, desired_size.y as u32, desired_fourcc),
        )?;

        self.size = Vec2::new(actual_format.width as usize, actual_format.height as usize);
        self.format = PixelFormat::from_fourcc(u32::from_le_bytes(actual_format.fourcc.repr))?;

        // build frame rate
        let desired_frame_rate = match self.config.frame_rate {
            Some(frame_rate) => frame_rate,
            None => {
                let params = Capture::params(&device)?;
                params.interval.denominator as f32 / params.interval.numerator as f32
            }
        };

        // set the frame rate and get the actual frame rate back
        let actual_params = Capture::set_params(
            &device,
            &v4l::video::capture::Parameters::with_fps(desired_frame_rate as u32),
        )?;
        let frame_rate =
            actual_params.interval.denominator as f32 / actual_params.interval.numerator as f32;

        self.stream = match MmapStream::with_buffers(&device, Type::VideoCapture, 4u32) {
            Ok(stream) => Some(stream),
            Err(error) => {
                return Err(VideoError::Stream(error.to_string()));
            }
        };

        Ok(VideoInfo {
            size: self.size,
            format: self.format,
            frame_rate,
        })
    }

    fn close(&mut self) {
        self.stream.take();
    }

    fn blocking_capture(&mut self) -> Result<Image, VideoError> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| VideoError::Stream("No stream".to_string()))?;
        match CaptureStream::next(stream) {
            Ok((frame_data, metadata)) => {
                // MJPEG buffers are only partially filled
                let used = (metadata.bytesused as usize).min(frame_data.len());
                let used = if used == 0 { frame_data.len() } else { used };
                Ok(Image::new(
                    self.size,
                    frame_data[..used].to_vec(),
                    self.format,
                ))
            }
            Err(error) => Err(VideoError::Stream(error.to_string())),
        }
    }
}
