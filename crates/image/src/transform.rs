use {crate::*, base::Vec2};

impl Image {
    /// Mirror the image around its vertical axis (selfie view).
    ///
    /// Only packed 3-byte formats are supported; convert with `to_rgb` first.
    pub fn flip_horizontal(&self) -> Result<Image, ImageError> {
        let bpp = self.packed_bytes_per_pixel()?;
        check_len(self, self.size.area() * bpp)?;

        let row_len = self.size.x * bpp;
        let mut data = Vec::with_capacity(self.data.len());
        for row in self.data.chunks_exact(row_len.max(1)) {
            for pixel in row.chunks_exact(bpp).rev() {
                data.extend_from_slice(pixel);
            }
        }

        Ok(Image::new(self.size, data, self.format))
    }

    /// Nearest-neighbor resize to `size`.
    pub fn resize(&self, size: Vec2<usize>) -> Result<Image, ImageError> {
        let bpp = self.packed_bytes_per_pixel()?;
        check_len(self, self.size.area() * bpp)?;
        if self.size.area() == 0 || size.area() == 0 {
            return Err(ImageError::Size(format!(
                "cannot resize {} to {}",
                self.size, size
            )));
        }

        let mut data = Vec::with_capacity(size.area() * bpp);
        for y in 0..size.y {
            let src_y = y * self.size.y / size.y;
            for x in 0..size.x {
                let src_x = x * self.size.x / size.x;
                let i = (src_y * self.size.x + src_x) * bpp;
                data.extend_from_slice(&self.data[i..i + bpp]);
            }
        }

        Ok(Image::new(size, data, self.format))
    }

    fn packed_bytes_per_pixel(&self) -> Result<usize, ImageError> {
        match self.format {
            PixelFormat::Rgb8 | PixelFormat::Bgr8 => Ok(3),
            other => Err(ImageError::Format(format!(
                "expected a packed RGB or BGR image, got {:?}",
                other
            ))),
        }
    }
}
