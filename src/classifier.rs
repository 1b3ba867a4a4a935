// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Visibility classification over a full landmark set.
//!
//! Turns the detector's raw per-landmark output into the derived signals
//! the service reports: a capped confidence ramp, full-body and upper-body
//! visibility flags, and the bounding span of the visible silhouette. The
//! thresholds here define observable behavior and are not configurable.

use serde::{Deserialize, Serialize};

use crate::landmark::{LANDMARK_COUNT, LandmarkSet, UPPER_BODY_LANDMARKS};

/// Visibility cutoff; a landmark counts as visible strictly above this.
pub const VISIBILITY_THRESHOLD: f32 = 0.5;

/// Fraction of all landmarks that must be visible for full confidence.
pub const CONFIDENCE_SCALE: f32 = 0.6;

/// Minimum visible height span for the full-body flag (strict).
pub const FULL_BODY_MIN_HEIGHT: f32 = 0.55;

/// Minimum visible landmark count for the full-body flag.
pub const FULL_BODY_MIN_COUNT: usize = 18;

/// Visible upper-body landmarks required for the upper-body flag.
pub const UPPER_BODY_REQUIRED: usize = 6;

/// Minimum visible width span for the crowding heuristic (strict).
pub const CROWDED_MIN_WIDTH: f32 = 0.75;

/// Maximum visible height span for the crowding heuristic (strict).
pub const CROWDED_MAX_HEIGHT: f32 = 0.35;

/// Bounding span of the visible landmarks within the normalized frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coverage {
    /// Horizontal span of visible landmarks, in image-width fractions.
    pub width_ratio: f32,
    /// Vertical span of visible landmarks, in image-height fractions.
    pub height_ratio: f32,
    /// Wide-but-short silhouette, suggesting several people close to the camera.
    pub crowded: bool,
}

/// Derived visibility signals for one detection.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Capped linear ramp over the visible landmark count, in [0, 1].
    pub confidence: f32,
    /// Whether enough of the body spans enough of the frame.
    pub full_body_visible: bool,
    /// Whether all six shoulder/elbow/wrist landmarks are visible.
    pub upper_body_visible: bool,
    /// Bounding span of the visible landmarks.
    pub coverage: Coverage,
}

impl Classification {
    /// Classify a full landmark set.
    ///
    /// Landmarks with visibility strictly above [`VISIBILITY_THRESHOLD`]
    /// form the visible set; all derived signals are computed from it. With
    /// an empty visible set both coverage ratios are exactly 0.0 and every
    /// flag is false.
    ///
    /// # Arguments
    ///
    /// * `landmarks` - The detector's full 33-landmark output.
    ///
    /// # Returns
    ///
    /// * The derived [`Classification`].
    #[must_use]
    pub fn from_landmarks(landmarks: &LandmarkSet) -> Self {
        let mut visible_count = 0usize;
        let mut upper_visible = 0usize;
        let mut min_x = f32::MAX;
        let mut max_x = f32::MIN;
        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;

        for landmark in landmarks.iter() {
            if landmark.visibility <= VISIBILITY_THRESHOLD {
                continue;
            }
            visible_count += 1;
            if UPPER_BODY_LANDMARKS.contains(&landmark.index) {
                upper_visible += 1;
            }
            min_x = min_x.min(landmark.x);
            max_x = max_x.max(landmark.x);
            min_y = min_y.min(landmark.y);
            max_y = max_y.max(landmark.y);
        }

        let (width_ratio, height_ratio) = if visible_count > 0 {
            (max_x - min_x, max_y - min_y)
        } else {
            (0.0, 0.0)
        };

        let crowded = width_ratio > CROWDED_MIN_WIDTH && height_ratio < CROWDED_MAX_HEIGHT;

        #[allow(clippy::cast_precision_loss)]
        let confidence =
            (visible_count as f32 / (LANDMARK_COUNT as f32 * CONFIDENCE_SCALE)).min(1.0);

        Self {
            confidence,
            full_body_visible: height_ratio > FULL_BODY_MIN_HEIGHT
                && visible_count >= FULL_BODY_MIN_COUNT,
            upper_body_visible: upper_visible >= UPPER_BODY_REQUIRED,
            coverage: Coverage {
                width_ratio,
                height_ratio,
                crowded,
            },
        }
    }

    /// The zero-signal classification reported when no person is detected.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            confidence: 0.0,
            full_body_visible: false,
            upper_body_visible: false,
            coverage: Coverage {
                width_ratio: 0.0,
                height_ratio: 0.0,
                crowded: false,
            },
        }
    }
}
