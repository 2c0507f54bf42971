use std::path::Path;

use image::{DynamicImage, ImageError};
use thiserror::Error;

use crate::types::PixelBuffer;

#[derive(Debug, Error)]
pub enum ImageLoadError {
    #[error("Failed to load image: {0}")]
    Load(#[from] ImageError),
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Invalid pixel data: {0}")]
    InvalidData(String),
}

/// Decode an image file into a row-major RGBA buffer.
pub fn load_image(path: &Path) -> Result<PixelBuffer, ImageLoadError> {
    if !path.exists() {
        return Err(ImageLoadError::NotFound(path.display().to_string()));
    }
    image_to_buffer(image::open(path)?)
}

/// Decode an in-memory image (format guessed from its header).
pub fn decode_image(bytes: &[u8]) -> Result<PixelBuffer, ImageLoadError> {
    image_to_buffer(image::load_from_memory(bytes)?)
}

/// Convert any decoded image into 8-bit RGBA, dropping extra precision.
pub fn image_to_buffer(img: DynamicImage) -> Result<PixelBuffer, ImageLoadError> {
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    PixelBuffer::new(width, height, rgba.into_raw())
        .map_err(|e| ImageLoadError::InvalidData(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbImage, RgbaImage};
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_load_nonexistent_file() {
        let result = load_image(Path::new("/nonexistent/path/image.png"));
        assert!(matches!(result.unwrap_err(), ImageLoadError::NotFound(_)));
    }

    #[test]
    fn load_image_preserves_pixels_and_alpha() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("input.png");

        let mut img = RgbaImage::from_pixel(10, 5, Rgba([255, 0, 0, 255]));
        img.put_pixel(3, 2, Rgba([0, 0, 255, 40]));
        img.save(&path).expect("write input image");

        let buffer = load_image(&path).expect("decode");
        assert_eq!((buffer.width(), buffer.height()), (10, 5));
        assert_eq!(buffer.rgba(0, 0), [255, 0, 0, 255]);
        assert_eq!(buffer.rgba(3, 2), [0, 0, 255, 40]);
    }

    #[test]
    fn rgb_images_become_opaque_rgba() {
        let img = RgbImage::from_pixel(2, 2, image::Rgb([10, 20, 30]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode png");

        let buffer = decode_image(&bytes).expect("decode");
        assert_eq!(buffer.rgba(1, 1), [10, 20, 30, 255]);
        assert_eq!(buffer.as_raw().len(), 2 * 2 * 4);
    }

    #[test]
    fn garbage_bytes_fail_to_decode() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result.unwrap_err(), ImageLoadError::Load(_)));
    }
}
