use {crate::*, base::Vec2};

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub size: Vec2<usize>,
    pub data: Vec<u8>,
    pub format: PixelFormat,
}

impl Image {
    pub fn new(size: Vec2<usize>, data: Vec<u8>, format: PixelFormat) -> Self {
        Self { size, data, format }
    }

    pub fn width(&self) -> usize {
        self.size.x
    }

    pub fn height(&self) -> usize {
        self.size.y
    }

    /// Convert to packed 8-bit RGB, the layout the landmark model expects.
    ///
    /// RGB images are returned as a copy.
    pub fn to_rgb(&self) -> Result<Image, ImageError> {
        let data = match self.format {
            PixelFormat::Rgb8 => {
                check_len(self, self.size.area() * 3)?;
                self.data.clone()
            }
            PixelFormat::Bgr8 => bgr_to_rgb(self.size, &self.data)?,
            PixelFormat::Yuyv => yuyv_to_rgb(self.size, &self.data)?,
            PixelFormat::Jpeg => return jpeg_to_rgb(self),
        };
        Ok(Image::new(self.size, data, PixelFormat::Rgb8))
    }
}

pub(crate) fn check_len(image: &Image, expected: usize) -> Result<(), ImageError> {
    if image.data.len() != expected {
        return Err(ImageError::Size(format!(
            "{:?} image of {} needs {} bytes, got {}",
            image.format,
            image.size,
            expected,
            image.data.len()
        )));
    }
    Ok(())
}
