// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Scripted detector backend.
//!
//! Returns a fixed result on every call. Used by tests and for wiring the
//! pipeline without a model file on disk.

use image::RgbImage;

use crate::detector::PoseEstimator;
use crate::error::Result;
use crate::landmark::LandmarkSet;

/// Detector that always returns the same scripted result.
#[derive(Debug, Clone)]
pub struct StubPose {
    result: Option<LandmarkSet>,
    calls: usize,
}

impl StubPose {
    /// Stub that reports the given landmark set on every frame.
    #[must_use]
    pub const fn detecting(landmarks: LandmarkSet) -> Self {
        Self {
            result: Some(landmarks),
            calls: 0,
        }
    }

    /// Stub that never detects a person.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            result: None,
            calls: 0,
        }
    }

    /// Number of frames this stub has been asked to process.
    #[must_use]
    pub const fn calls(&self) -> usize {
        self.calls
    }
}

impl PoseEstimator for StubPose {
    fn detect(&mut self, _frame: &RgbImage) -> Result<Option<LandmarkSet>> {
        self.calls += 1;
        Ok(self.result.clone())
    }

    fn model_info(&self) -> String {
        match self.result {
            Some(_) => "stub pose backend (scripted detection)".to_string(),
            None => "stub pose backend (no detection)".to_string(),
        }
    }
}
