// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Integration tests for the pose visibility library

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

use pose_visibility::{
    Classification, LANDMARK_COUNT, Landmark, LandmarkSet, PoseEstimator, StubPose, decode_frame,
};

fn frame_data_url() -> String {
    let img = RgbImage::from_pixel(32, 24, Rgb([200, 180, 160]));
    let mut buf = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(img)
        .write_to(&mut buf, ImageFormat::Jpeg)
        .unwrap();
    format!(
        "data:image/jpeg;base64,{}",
        STANDARD.encode(buf.into_inner())
    )
}

fn standing_pose() -> LandmarkSet {
    // Roughly head-to-toe figure occupying most of the frame height.
    let landmarks = (0..LANDMARK_COUNT)
        .map(|i| {
            let y = 0.1 + 0.8 * (i as f32 / (LANDMARK_COUNT - 1) as f32);
            Landmark::new(i, 0.5, y, 0.0, 0.95)
        })
        .collect();
    LandmarkSet::from_vec(landmarks).unwrap()
}

#[test]
fn test_decode_detect_classify_pipeline() {
    let frame = decode_frame(&frame_data_url()).expect("frame should decode");
    assert_eq!(frame.dimensions(), (32, 24));

    let mut detector = StubPose::detecting(standing_pose());
    let landmarks = detector.detect(&frame).unwrap().expect("scripted detection");

    let result = Classification::from_landmarks(&landmarks);
    assert!((result.confidence - 1.0).abs() < f32::EPSILON);
    assert!(result.full_body_visible);
    assert!(result.upper_body_visible);
    assert!(!result.coverage.crowded);
    assert!((result.coverage.height_ratio - 0.8).abs() < 1e-6);
}

#[test]
fn test_no_detection_yields_empty_classification() {
    let frame = decode_frame(&frame_data_url()).unwrap();

    let mut detector = StubPose::empty();
    assert!(detector.detect(&frame).unwrap().is_none());

    let empty = Classification::empty();
    assert!((empty.confidence - 0.0).abs() < f32::EPSILON);
    assert!(!empty.full_body_visible);
    assert!(!empty.upper_body_visible);
}

#[test]
fn test_landmark_set_round_trips_through_json() {
    let set = standing_pose();
    let json = serde_json::to_string(&set).unwrap();
    let back: LandmarkSet = serde_json::from_str(&json).unwrap();

    assert_eq!(back.as_slice().len(), LANDMARK_COUNT);
    for (original, restored) in set.iter().zip(back.iter()) {
        assert_eq!(original.index, restored.index);
        assert_eq!(original.x, restored.x);
        assert_eq!(original.y, restored.y);
        assert_eq!(original.z, restored.z);
        assert_eq!(original.visibility, restored.visibility);
    }
}
