// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! ONNX Runtime backend for the pose landmark model.
//!
//! Wraps a single-person landmark model with the standard 33-point
//! topology: a 256×256 RGB input produces a flat landmark tensor
//! (33 real + 6 auxiliary points × five values) plus a scalar
//! pose-presence score. Coordinates come back in input-pixel units and are
//! normalized here; visibility comes back as a logit and is squashed here.

use std::path::Path;

use image::RgbImage;
use ndarray::Array4;
use ort::session::Session;
use ort::value::TensorRef;

use crate::detector::{DetectorConfig, PoseEstimator};
use crate::error::{PoseError, Result};
use crate::landmark::{LANDMARK_COUNT, Landmark, LandmarkSet};
use crate::preprocessing::preprocess_frame;

/// Model input edge in pixels.
const INPUT_EDGE: usize = 256;

/// Values per landmark in the output tensor: x, y, z, visibility, presence.
const VALUES_PER_LANDMARK: usize = 5;

/// Auxiliary landmarks appended after the 33 real ones.
const AUX_LANDMARKS: usize = 6;

/// Total length of the flat landmark output tensor.
const LANDMARK_TENSOR_LEN: usize = (LANDMARK_COUNT + AUX_LANDMARKS) * VALUES_PER_LANDMARK;

/// Weight of the current frame when smoothing landmark positions.
const SMOOTHING_ALPHA: f32 = 0.7;

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Pose landmark model backed by ONNX Runtime.
///
/// Holds one session for the lifetime of the process. The smoothing state
/// carried between calls is the reason `detect` is `&mut self`; callers
/// sharing an instance across threads must serialize access.
pub struct OnnxPoseModel {
    /// ONNX Runtime session.
    session: Session,
    /// Input tensor name.
    input_name: String,
    /// Output tensor names.
    output_names: Vec<String>,
    /// Detector configuration.
    config: DetectorConfig,
    /// Last reported positions, kept while tracking for smoothing.
    smoothed: Option<Vec<[f32; 3]>>,
    /// Whether the model has been warmed up.
    warmed_up: bool,
    /// Path the model was loaded from.
    model_path: String,
}

impl OnnxPoseModel {
    /// Load a pose landmark model from an ONNX file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the ONNX model file.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file doesn't exist or can't be loaded.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_with_config(path, DetectorConfig::default())
    }

    /// Load a pose landmark model with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the ONNX model file.
    /// * `config` - Detector configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the model file doesn't exist or can't be loaded.
    pub fn load_with_config<P: AsRef<Path>>(path: P, config: DetectorConfig) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(PoseError::ModelLoadError(format!(
                "Model file not found: {}",
                path.display()
            )));
        }

        let session = Session::builder()
            .map_err(|e| {
                PoseError::ModelLoadError(format!("Failed to create session builder: {e}"))
            })?
            .with_optimization_level(ort::session::builder::GraphOptimizationLevel::Level3)
            .map_err(|e| {
                PoseError::ModelLoadError(format!("Failed to set optimization level: {e}"))
            })?
            .with_intra_threads(config.num_threads)
            .map_err(|e| {
                PoseError::ModelLoadError(format!("Failed to set intra-thread count: {e}"))
            })?
            .commit_from_file(path)
            .map_err(|e| PoseError::ModelLoadError(format!("Failed to load model: {e}")))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "input".to_string());

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        Ok(Self {
            session,
            input_name,
            output_names,
            config,
            smoothed: None,
            warmed_up: false,
            model_path: path.display().to_string(),
        })
    }

    /// Warm up the model by running inference on a dummy input.
    ///
    /// Pre-allocates memory and finalizes the execution graph so the first
    /// real frame doesn't pay the setup cost. Called automatically on the
    /// first detection.
    ///
    /// # Errors
    ///
    /// Returns an error if the warmup inference fails.
    pub fn warmup(&mut self) -> Result<()> {
        if self.warmed_up {
            return Ok(());
        }

        let dummy = Array4::<f32>::zeros((1, INPUT_EDGE, INPUT_EDGE, 3));
        let _ = self.run_inference(&dummy)?;

        self.warmed_up = true;
        Ok(())
    }

    /// Run the session and extract every f32 output as a flat vector.
    fn run_inference(&mut self, input: &Array4<f32>) -> Result<Vec<Vec<f32>>> {
        let input_contiguous = input.as_standard_layout();

        let input_tensor = TensorRef::from_array_view(&input_contiguous).map_err(|e| {
            PoseError::InferenceError(format!("Failed to create input tensor: {e}"))
        })?;

        let inputs = ort::inputs![&self.input_name => input_tensor];

        let outputs = self
            .session
            .run(inputs)
            .map_err(|e| PoseError::InferenceError(format!("Inference failed: {e}")))?;

        let mut tensors = Vec::with_capacity(self.output_names.len());
        for name in &self.output_names {
            let output = outputs
                .get(name.as_str())
                .ok_or_else(|| PoseError::InferenceError(format!("Output '{name}' not found")))?;

            // Auxiliary outputs (segmentation, heatmaps) may not be f32; they
            // are not consumed, so extraction failures collapse to empty.
            match output.try_extract_tensor::<f32>() {
                Ok((_, data)) => tensors.push(data.to_vec()),
                Err(_) => tensors.push(Vec::new()),
            }
        }

        Ok(tensors)
    }

    /// Decode the raw landmark tensor into the public landmark set.
    fn decode_landmarks(&mut self, raw: &[f32]) -> Result<LandmarkSet> {
        #[allow(clippy::cast_precision_loss)]
        let edge = INPUT_EDGE as f32;

        let mut landmarks = Vec::with_capacity(LANDMARK_COUNT);
        for index in 0..LANDMARK_COUNT {
            let base = index * VALUES_PER_LANDMARK;
            landmarks.push(Landmark::new(
                index,
                raw[base] / edge,
                raw[base + 1] / edge,
                raw[base + 2] / edge,
                sigmoid(raw[base + 3]),
            ));
        }

        if self.config.smooth_landmarks {
            if let Some(previous) = &self.smoothed {
                for (landmark, prev) in landmarks.iter_mut().zip(previous) {
                    landmark.x = SMOOTHING_ALPHA.mul_add(landmark.x, (1.0 - SMOOTHING_ALPHA) * prev[0]);
                    landmark.y = SMOOTHING_ALPHA.mul_add(landmark.y, (1.0 - SMOOTHING_ALPHA) * prev[1]);
                    landmark.z = SMOOTHING_ALPHA.mul_add(landmark.z, (1.0 - SMOOTHING_ALPHA) * prev[2]);
                }
            }
            self.smoothed = Some(landmarks.iter().map(|l| [l.x, l.y, l.z]).collect());
        }

        LandmarkSet::from_vec(landmarks)
    }
}

impl PoseEstimator for OnnxPoseModel {
    fn detect(&mut self, frame: &RgbImage) -> Result<Option<LandmarkSet>> {
        if !self.warmed_up {
            self.warmup()?;
        }

        let tensor = preprocess_frame(frame, (INPUT_EDGE, INPUT_EDGE));
        let outputs = self.run_inference(&tensor)?;

        let raw = outputs
            .iter()
            .find(|t| t.len() == LANDMARK_TENSOR_LEN)
            .ok_or_else(|| {
                PoseError::LandmarkError(format!(
                    "no landmark output of length {LANDMARK_TENSOR_LEN} in model outputs"
                ))
            })?;

        let score = outputs
            .iter()
            .find(|t| t.len() == 1)
            .map(|t| t[0])
            .ok_or_else(|| {
                PoseError::LandmarkError("no pose-presence output in model outputs".to_string())
            })?;

        // While tracking, the (lower-stakes) tracking threshold applies; a
        // drop below it ends the track and clears smoothing state.
        let threshold = if self.smoothed.is_some() {
            self.config.min_tracking_confidence
        } else {
            self.config.min_detection_confidence
        };

        if score < threshold {
            self.smoothed = None;
            return Ok(None);
        }

        self.decode_landmarks(raw).map(Some)
    }

    fn model_info(&self) -> String {
        format!(
            "ONNX pose landmark model ({}) - smoothing: {}, det: {}, track: {}",
            self.model_path,
            self.config.smooth_landmarks,
            self.config.min_detection_confidence,
            self.config.min_tracking_confidence
        )
    }
}

impl std::fmt::Debug for OnnxPoseModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxPoseModel")
            .field("model_path", &self.model_path)
            .field("config", &self.config)
            .field("warmed_up", &self.warmed_up)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_not_found() {
        let result = OnnxPoseModel::load("nonexistent.onnx");
        assert!(result.is_err());
        assert!(matches!(
            result.unwrap_err(),
            PoseError::ModelLoadError(_)
        ));
    }

    #[test]
    fn test_sigmoid_range() {
        assert!((sigmoid(0.0) - 0.5).abs() < f32::EPSILON);
        assert!(sigmoid(10.0) > 0.999);
        assert!(sigmoid(-10.0) < 0.001);
    }

    #[test]
    fn test_landmark_tensor_len() {
        assert_eq!(LANDMARK_TENSOR_LEN, 195);
    }
}
