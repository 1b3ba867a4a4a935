// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Image preprocessing for the pose landmark model.
//!
//! The landmark model consumes the full frame as a square NHWC float
//! tensor normalized to [0, 1]. Unlike detector-style models there is no
//! letterbox step; the frame is resized edge-to-edge and the model's
//! normalized output maps straight back onto the original image.

use image::RgbImage;
use image::imageops::{self, FilterType};
use ndarray::Array4;

/// Preprocess a frame for landmark inference.
///
/// Performs a bilinear resize to `target_size` and converts to an NHWC
/// tensor normalized to [0, 1].
///
/// # Arguments
///
/// * `frame` - Input RGB frame.
/// * `target_size` - Model input size as (height, width).
///
/// # Returns
///
/// * Tensor of shape (1, height, width, 3).
#[must_use]
pub fn preprocess_frame(frame: &RgbImage, target_size: (usize, usize)) -> Array4<f32> {
    let (height, width) = target_size;

    #[allow(clippy::cast_possible_truncation)]
    let resized = if frame.dimensions() == (width as u32, height as u32) {
        frame.clone()
    } else {
        imageops::resize(frame, width as u32, height as u32, FilterType::Triangle)
    };

    let mut tensor = Array4::<f32>::zeros((1, height, width, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        let (x, y) = (x as usize, y as usize);
        tensor[[0, y, x, 0]] = f32::from(pixel.0[0]) / 255.0;
        tensor[[0, y, x, 1]] = f32::from(pixel.0[1]) / 255.0;
        tensor[[0, y, x, 2]] = f32::from(pixel.0[2]) / 255.0;
    }

    tensor
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_preprocess_shape_and_range() {
        let frame = RgbImage::from_pixel(64, 48, Rgb([255, 128, 0]));
        let tensor = preprocess_frame(&frame, (256, 256));
        assert_eq!(tensor.shape(), &[1, 256, 256, 3]);

        assert!((tensor[[0, 0, 0, 0]] - 1.0).abs() < f32::EPSILON);
        assert!((tensor[[0, 0, 0, 1]] - 128.0 / 255.0).abs() < f32::EPSILON);
        assert!((tensor[[0, 0, 0, 2]] - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_preprocess_skips_resize_at_target_size() {
        let mut frame = RgbImage::from_pixel(256, 256, Rgb([0, 0, 0]));
        frame.put_pixel(10, 20, Rgb([255, 255, 255]));
        let tensor = preprocess_frame(&frame, (256, 256));
        assert!((tensor[[0, 20, 10, 0]] - 1.0).abs() < f32::EPSILON);
        assert!((tensor[[0, 20, 11, 0]] - 0.0).abs() < f32::EPSILON);
    }
}
