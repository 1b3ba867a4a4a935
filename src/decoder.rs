// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Camera frame decoding.
//!
//! Browser clients ship frames as data URLs (`data:image/jpeg;base64,...`).
//! This module strips the metadata prefix, base64-decodes the payload, and
//! decodes the bytes into an RGB pixel buffer. Every failure mode collapses
//! into `None` so the request handler can answer with a single client error.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::RgbImage;

/// Decode a data-URL-style base64 frame into an RGB image.
///
/// Everything up to and including the first comma is treated as data-URL
/// metadata and discarded; without a comma the whole string is the payload.
/// The decoded buffer uses the `image` crate's native RGB channel order, so
/// no channel swap happens between here and the detector.
///
/// No upper bound is applied to the decoded dimensions; oversized frames
/// are passed through to the detector as-is.
///
/// # Arguments
///
/// * `data_url` - Data URL or raw base64 string.
///
/// # Returns
///
/// * `Some(RgbImage)` on success, `None` for empty input, malformed
///   base64, undecodable image bytes, or a zero-size result.
#[must_use]
pub fn decode_frame(data_url: &str) -> Option<RgbImage> {
    if data_url.is_empty() {
        return None;
    }

    let payload = match data_url.split_once(',') {
        Some((_, rest)) => rest,
        None => data_url,
    };

    let bytes = STANDARD.decode(payload).ok()?;
    let image = image::load_from_memory(&bytes).ok()?.to_rgb8();

    if image.width() == 0 || image.height() == 0 {
        return None;
    }

    Some(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb};
    use std::io::Cursor;

    fn png_base64(width: u32, height: u32) -> String {
        let img = RgbImage::from_pixel(width, height, Rgb([40, 80, 120]));
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        STANDARD.encode(buf.into_inner())
    }

    #[test]
    fn test_decode_data_url() {
        let data_url = format!("data:image/png;base64,{}", png_base64(6, 4));
        let frame = decode_frame(&data_url).unwrap();
        assert_eq!(frame.dimensions(), (6, 4));
        assert_eq!(frame.get_pixel(0, 0).0, [40, 80, 120]);
    }

    #[test]
    fn test_decode_raw_payload_without_comma() {
        let frame = decode_frame(&png_base64(2, 2)).unwrap();
        assert_eq!(frame.dimensions(), (2, 2));
    }

    #[test]
    fn test_decode_empty_input() {
        assert!(decode_frame("").is_none());
    }

    #[test]
    fn test_decode_malformed_base64() {
        assert!(decode_frame("data:image/png;base64,@@not-base64@@").is_none());
    }

    #[test]
    fn test_decode_invalid_image_bytes() {
        let payload = STANDARD.encode(b"definitely not an image");
        assert!(decode_frame(&payload).is_none());
    }

    #[test]
    fn test_decode_metadata_only() {
        assert!(decode_frame("data:image/png;base64,").is_none());
    }
}
