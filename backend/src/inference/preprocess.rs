//! Converts an uploaded image into the flat grayscale row the model expects.

use std::path::Path;

use image::DynamicImage;
use image::imageops::FilterType;
use ndarray::Array2;

use crate::config::ImageConfig;
use crate::error::{InferenceError, Result};

/// Reads an image from disk and produces a 1×N tensor with values in [0,1].
pub fn preprocess(path: &Path, cfg: &ImageConfig) -> Result<Array2<f32>> {
    let img = image::open(path)?;
    tensor_from_image(&img, cfg)
}

/// Grayscale, resize, flatten, scale by 1/255.
pub fn tensor_from_image(img: &DynamicImage, cfg: &ImageConfig) -> Result<Array2<f32>> {
    let gray = img.to_luma8();
    let resized = image::imageops::resize(&gray, cfg.width, cfg.height, FilterType::Triangle);
    let pixels: Vec<f32> = resized
        .into_raw()
        .into_iter()
        .map(|p| p as f32 / 255.0)
        .collect();
    let len = pixels.len();
    Array2::from_shape_vec((1, len), pixels)
        .map_err(|e| InferenceError::Preprocessing(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Luma, Rgb};

    fn test_config() -> ImageConfig {
        ImageConfig {
            width: 100,
            height: 100,
            channels: 1,
        }
    }

    #[test]
    fn test_tensor_shape_and_value_range() {
        // 200x150 RGB gradient, roughly the example from the upload flow
        let img = ImageBuffer::from_fn(200, 150, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let tensor = tensor_from_image(&DynamicImage::ImageRgb8(img), &test_config()).unwrap();

        assert_eq!(tensor.dim(), (1, 10_000));
        assert!(tensor.iter().all(|&v| (0.0..=1.0).contains(&v)));
    }

    #[test]
    fn test_one_by_one_pixel_still_resizes() {
        let img = ImageBuffer::from_pixel(1, 1, Luma([200u8]));
        let tensor = tensor_from_image(&DynamicImage::ImageLuma8(img), &test_config()).unwrap();

        assert_eq!(tensor.dim(), (1, 10_000));
        // Uniform source stays uniform after resampling.
        let expected = 200.0 / 255.0;
        assert!(tensor.iter().all(|&v| (v - expected).abs() < 1e-6));
    }

    #[test]
    fn test_preprocess_is_deterministic() {
        let img = ImageBuffer::from_fn(37, 53, |x, y| Rgb([x as u8, y as u8, 128u8]));
        let img = DynamicImage::ImageRgb8(img);
        let a = tensor_from_image(&img, &test_config()).unwrap();
        let b = tensor_from_image(&img, &test_config()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_preprocess_reads_file_from_disk() {
        let path = std::env::temp_dir().join("preprocess_reads_file_from_disk.png");
        let img = ImageBuffer::from_pixel(64, 48, Luma([17u8]));
        img.save(&path).unwrap();

        let tensor = preprocess(&path, &test_config()).unwrap();
        assert_eq!(tensor.dim(), (1, 10_000));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_undecodable_file_is_a_decode_error() {
        let path = std::env::temp_dir().join("undecodable_file_is_a_decode_error.png");
        std::fs::write(&path, b"not an image at all").unwrap();

        let err = preprocess(&path, &test_config()).unwrap_err();
        assert!(matches!(err, InferenceError::Decode(_)));

        std::fs::remove_file(&path).ok();
    }
}
