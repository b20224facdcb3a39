use {crate::*, base::Vec2};

// BT.601 YUV-to-RGB conversion for a single pixel (fixed-point, shift 8)
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> (u8, u8, u8) {
    let y = y as i32;
    let u = u as i32 - 128;
    let v = v as i32 - 128;
    let r = (y + ((359 * v) >> 8)).clamp(0, 255) as u8;
    let g = (y - ((88 * u + 183 * v) >> 8)).clamp(0, 255) as u8;
    let b = (y + ((454 * u) >> 8)).clamp(0, 255) as u8;
    (r, g, b)
}

pub fn yuyv_to_rgb(size: Vec2<usize>, data: &[u8]) -> Result<Vec<u8>, ImageError> {
    let pixel_count = size.area();
    if size.x % 2 != 0 || data.len() != pixel_count * 2 {
        return Err(ImageError::Size(format!(
            "YUYV image of {} needs an even width and {} bytes, got {}",
            size,
            pixel_count * 2,
            data.len()
        )));
    }

    let mut rgb = Vec::with_capacity(pixel_count * 3);
    for chunk in data.chunks_exact(4) {
        let (r0, g0, b0) = yuv_to_rgb(chunk[0], chunk[1], chunk[3]);
        let (r1, g1, b1) = yuv_to_rgb(chunk[2], chunk[1], chunk[3]);
        rgb.extend_from_slice(&[r0, g0, b0, r1, g1, b1]);
    }

    Ok(rgb)
}

pub fn bgr_to_rgb(size: Vec2<usize>, data: &[u8]) -> Result<Vec<u8>, ImageError> {
    if data.len() != size.area() * 3 {
        return Err(ImageError::Size(format!(
            "BGR image of {} needs {} bytes, got {}",
            size,
            size.area() * 3,
            data.len()
        )));
    }
    Ok(data
        .chunks_exact(3)
        .flat_map(|c| [c[2], c[1], c[0]])
        .collect())
}

pub fn jpeg_to_rgb(image: &Image) -> Result<Image, ImageError> {
    image.format.ensure_format(PixelFormat::Jpeg)?;
    let decoded = crates_image::load_from_memory(&image.data)
        .map_err(|e| ImageError::Decode(format!("Failed to decode JPEG: {}", e)))?;

    let rgb_image = decoded.to_rgb8();
    let (width, height) = rgb_image.dimensions();
    let size = Vec2::new(width as usize, height as usize);
    let data = rgb_image.into_raw();

    Ok(Image::new(size, data, PixelFormat::Rgb8))
}
