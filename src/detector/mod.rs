// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Pose detector abstraction.
//!
//! The landmark model is an external capability behind a narrow contract:
//! image in, full landmark set or nothing out. Backends implement
//! [`PoseEstimator`]; the classifier and the request handler never see
//! model-specific types.
//!
//! A backend may keep temporal smoothing state across calls, so a single
//! long-lived instance is shared per process and callers serialize access
//! to it (the server guards it with a mutex).

pub mod stub;

#[cfg(feature = "backend-ort")]
pub mod onnx;

use image::RgbImage;

use crate::error::Result;
use crate::landmark::LandmarkSet;

pub use stub::StubPose;

#[cfg(feature = "backend-ort")]
pub use onnx::OnnxPoseModel;

/// A pose landmark detector backend.
///
/// One synchronous, blocking call per frame; no batching, no caching.
/// `detect` takes `&mut self` because backends may carry smoothing state
/// between successive frames of a stream.
pub trait PoseEstimator: Send {
    /// Run landmark detection on one RGB frame.
    ///
    /// # Arguments
    ///
    /// * `frame` - Decoded RGB frame.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(_))` with the full 33-landmark set when a person is found.
    /// * `Ok(None)` when no person is detected.
    ///
    /// # Errors
    ///
    /// Returns an error only for faults outside the detection contract
    /// (inference failure, malformed model output).
    fn detect(&mut self, frame: &RgbImage) -> Result<Option<LandmarkSet>>;

    /// Human-readable description of the backend and its configuration.
    fn model_info(&self) -> String;
}

/// Fixed configuration for the pose landmark backend.
///
/// These are service-level parameters, not tunable per request. Defaults
/// match the deployed detector: single person, landmark smoothing on,
/// detection and tracking confidence at 0.5.
///
/// # Example
///
/// ```rust
/// use pose_visibility::DetectorConfig;
///
/// let config = DetectorConfig::new().with_smooth_landmarks(false);
/// ```
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Minimum pose-presence score for a detection to be reported.
    pub min_detection_confidence: f32,
    /// Minimum score to keep tracking across successive frames.
    pub min_tracking_confidence: f32,
    /// Smooth landmark positions across successive frames.
    pub smooth_landmarks: bool,
    /// Number of intra-op threads for ONNX Runtime; 0 lets the runtime decide.
    pub num_threads: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            smooth_landmarks: true,
            num_threads: 0,
        }
    }
}

impl DetectorConfig {
    /// Create a configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the minimum pose-presence score for a detection.
    #[must_use]
    pub const fn with_min_detection_confidence(mut self, threshold: f32) -> Self {
        self.min_detection_confidence = threshold;
        self
    }

    /// Set the minimum score to keep tracking across frames.
    #[must_use]
    pub const fn with_min_tracking_confidence(mut self, threshold: f32) -> Self {
        self.min_tracking_confidence = threshold;
        self
    }

    /// Enable or disable landmark smoothing across frames.
    #[must_use]
    pub const fn with_smooth_landmarks(mut self, smooth: bool) -> Self {
        self.smooth_landmarks = smooth;
        self
    }

    /// Set the number of intra-op threads; 0 lets the runtime decide.
    #[must_use]
    pub const fn with_threads(mut self, threads: usize) -> Self {
        self.num_threads = threads;
        self
    }
}
