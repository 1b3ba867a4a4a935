// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use serde::Serialize;

use crate::classifier::Classification;
use crate::cli::args::PredictArgs;
use crate::cli::logging::set_verbose;
use crate::detector::{DetectorConfig, OnnxPoseModel, PoseEstimator};
use crate::error::{PoseError, Result};
use crate::landmark::Landmark;
use crate::{info, success, verbose, warn};

/// Payload printed with `--json`; matches the server wire format.
#[derive(Debug, Serialize)]
struct PredictReport<'a> {
    landmarks: &'a [Landmark],
    #[serde(flatten)]
    classification: &'a Classification,
}

/// Run pose detection and visibility classification on a single image.
///
/// # Arguments
///
/// * `args` - Parsed predict arguments.
///
/// # Errors
///
/// Returns an error if the model or the image can't be loaded, or if
/// inference fails.
pub fn run_prediction(args: &PredictArgs) -> Result<()> {
    set_verbose(args.verbose);

    let mut model = OnnxPoseModel::load_with_config(&args.model, DetectorConfig::default())?;
    verbose!("Loaded {}", model.model_info());

    let frame = image::open(&args.source)
        .map_err(|e| PoseError::ImageError(format!("Failed to load image {}: {e}", args.source)))?
        .to_rgb8();
    verbose!("Frame: {}x{}", frame.width(), frame.height());

    let detection = model.detect(&frame)?;

    if args.json {
        let classification = detection
            .as_ref()
            .map_or_else(Classification::empty, Classification::from_landmarks);
        let report = PredictReport {
            landmarks: detection.as_ref().map_or(&[], |set| set.as_slice()),
            classification: &classification,
        };
        info!(
            "{}",
            serde_json::to_string_pretty(&report).unwrap_or_default()
        );
        return Ok(());
    }

    match detection {
        Some(landmarks) => {
            let classification = Classification::from_landmarks(&landmarks);
            success!(
                "Person detected - confidence {:.2}, full body: {}, upper body: {}",
                classification.confidence,
                classification.full_body_visible,
                classification.upper_body_visible
            );
            info!(
                "Coverage: width {:.2}, height {:.2}, crowded: {}",
                classification.coverage.width_ratio,
                classification.coverage.height_ratio,
                classification.coverage.crowded
            );
        }
        None => {
            warn!("No person detected in frame");
        }
    }

    Ok(())
}
