// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Landmark data model for single-person pose estimation.
//!
//! The detector produces an ordered set of 33 anatomical keypoints with
//! normalized coordinates and a per-point visibility score. Indices are
//! fixed by the model topology and never change between frames.

use serde::{Deserialize, Serialize};

use crate::error::{PoseError, Result};

/// Number of landmarks produced per detection.
pub const LANDMARK_COUNT: usize = 33;

/// Landmark indices covering shoulders, elbows, and wrists.
///
/// Used by the classifier to decide upper-body visibility; the set is fixed
/// by the model topology regardless of detector configuration.
pub const UPPER_BODY_LANDMARKS: [usize; 6] = [11, 12, 13, 14, 15, 16];

/// Anatomical landmark indices (33 total).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BodyLandmark {
    Nose = 0,
    LeftEyeInner = 1,
    LeftEye = 2,
    LeftEyeOuter = 3,
    RightEyeInner = 4,
    RightEye = 5,
    RightEyeOuter = 6,
    LeftEar = 7,
    RightEar = 8,
    MouthLeft = 9,
    MouthRight = 10,
    LeftShoulder = 11,
    RightShoulder = 12,
    LeftElbow = 13,
    RightElbow = 14,
    LeftWrist = 15,
    RightWrist = 16,
    LeftPinky = 17,
    RightPinky = 18,
    LeftIndex = 19,
    RightIndex = 20,
    LeftThumb = 21,
    RightThumb = 22,
    LeftHip = 23,
    RightHip = 24,
    LeftKnee = 25,
    RightKnee = 26,
    LeftAnkle = 27,
    RightAnkle = 28,
    LeftHeel = 29,
    RightHeel = 30,
    LeftFootIndex = 31,
    RightFootIndex = 32,
}

impl BodyLandmark {
    /// Returns the landmark's index into a [`LandmarkSet`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// One anatomical keypoint estimate.
///
/// `x` and `y` are normalized to [0, 1] relative to image width/height;
/// `z` is a relative, unitless depth. `visibility` is the model's estimate
/// that the point is unoccluded — treated as [0, 1] downstream but not
/// clamped on ingest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    /// Index into the fixed 33-landmark topology.
    pub index: usize,
    /// Normalized horizontal position.
    pub x: f32,
    /// Normalized vertical position.
    pub y: f32,
    /// Relative depth.
    pub z: f32,
    /// Visibility confidence.
    pub visibility: f32,
}

impl Landmark {
    /// Create a new landmark.
    #[must_use]
    pub const fn new(index: usize, x: f32, y: f32, z: f32, visibility: f32) -> Self {
        Self {
            index,
            x,
            y,
            z,
            visibility,
        }
    }
}

/// An ordered set of exactly [`LANDMARK_COUNT`] landmarks.
///
/// A detection either yields a full set or nothing; partial sets are a
/// contract violation and rejected at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LandmarkSet(Vec<Landmark>);

impl LandmarkSet {
    /// Build a landmark set from a vector.
    ///
    /// # Arguments
    ///
    /// * `landmarks` - Exactly [`LANDMARK_COUNT`] landmarks, in index order.
    ///
    /// # Errors
    ///
    /// Returns [`PoseError::LandmarkError`] if the count is wrong.
    pub fn from_vec(landmarks: Vec<Landmark>) -> Result<Self> {
        if landmarks.len() != LANDMARK_COUNT {
            return Err(PoseError::LandmarkError(format!(
                "expected {LANDMARK_COUNT} landmarks, got {}",
                landmarks.len()
            )));
        }
        Ok(Self(landmarks))
    }

    /// View the landmarks as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Landmark] {
        &self.0
    }

    /// Iterate over the landmarks in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, Landmark> {
        self.0.iter()
    }

    /// Look up a landmark by its anatomical name.
    #[must_use]
    pub fn get(&self, landmark: BodyLandmark) -> Landmark {
        self.0[landmark.index()]
    }
}

impl<'a> IntoIterator for &'a LandmarkSet {
    type Item = &'a Landmark;
    type IntoIter = std::slice::Iter<'a, Landmark>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_set() -> Vec<Landmark> {
        (0..LANDMARK_COUNT)
            .map(|i| Landmark::new(i, 0.5, 0.5, 0.0, 0.9))
            .collect()
    }

    #[test]
    fn test_from_vec_requires_exact_count() {
        assert!(LandmarkSet::from_vec(full_set()).is_ok());
        assert!(LandmarkSet::from_vec(vec![]).is_err());
        assert!(LandmarkSet::from_vec(full_set()[..17].to_vec()).is_err());
    }

    #[test]
    fn test_get_by_body_landmark() {
        let mut landmarks = full_set();
        landmarks[BodyLandmark::LeftWrist.index()].x = 0.25;
        let set = LandmarkSet::from_vec(landmarks).unwrap();
        assert!((set.get(BodyLandmark::LeftWrist).x - 0.25).abs() < f32::EPSILON);
        assert_eq!(set.get(BodyLandmark::RightFootIndex).index, 32);
    }

    #[test]
    fn test_upper_body_indices_match_topology() {
        assert_eq!(UPPER_BODY_LANDMARKS[0], BodyLandmark::LeftShoulder.index());
        assert_eq!(UPPER_BODY_LANDMARKS[5], BodyLandmark::RightWrist.index());
    }

    #[test]
    fn test_serialize_preserves_every_field() {
        let mut landmarks = full_set();
        landmarks[3] = Landmark::new(3, 0.125, 0.375, -0.5, 0.0625);
        let set = LandmarkSet::from_vec(landmarks).unwrap();

        let json = serde_json::to_value(&set).unwrap();
        let entries = json.as_array().unwrap();
        assert_eq!(entries.len(), LANDMARK_COUNT);
        assert_eq!(entries[3]["index"], 3);
        assert_eq!(entries[3]["x"], 0.125);
        assert_eq!(entries[3]["y"], 0.375);
        assert_eq!(entries[3]["z"], -0.5);
        assert_eq!(entries[3]["visibility"], 0.0625);

        let back: LandmarkSet = serde_json::from_value(json).unwrap();
        assert_eq!(back, set);
    }
}
