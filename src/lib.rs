// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

#![allow(clippy::multiple_crate_versions)]

//! # Pose Visibility Library
//!
//! Single-person pose landmark detection and body-visibility metrics,
//! written in Rust. Given a camera frame, the library decodes it, runs a
//! pose landmark model over it, and derives structured signals describing
//! how much of a body is visible: a confidence ramp, full-body and
//! upper-body flags, and the bounding span of the visible silhouette with
//! a crowding heuristic.
//!
//! The detection model is an external capability wrapped behind the narrow
//! [`PoseEstimator`] contract (frame in, 33 ordered landmarks or nothing
//! out); everything above it — decoding, thresholding, response shaping —
//! is model-agnostic.
//!
//! ## Quick Start
//!
//! ```no_run
//! use pose_visibility::{Classification, OnnxPoseModel, PoseEstimator, decode_frame};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut model = OnnxPoseModel::load("pose_landmark_full.onnx")?;
//!
//!     let frame = decode_frame("data:image/jpeg;base64,...").ok_or("invalid frame")?;
//!
//!     match model.detect(&frame)? {
//!         Some(landmarks) => {
//!             let result = Classification::from_landmarks(&landmarks);
//!             println!(
//!                 "confidence {:.2}, full body: {}",
//!                 result.confidence, result.full_body_visible
//!             );
//!         }
//!         None => println!("no person detected"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## HTTP Service
//!
//! The `docker/server` crate hosts this pipeline behind `POST /detect-pose`:
//! a JSON body with a base64 `image` field in, the landmark list plus the
//! classification out. See that crate for the wire format.
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`decoder`] | Data-URL/base64 frame decoding into RGB buffers |
//! | [`landmark`] | [`Landmark`], [`LandmarkSet`], and the 33-point topology |
//! | [`detector`] | [`PoseEstimator`] contract, [`DetectorConfig`], backends |
//! | [`classifier`] | [`Classification`] and [`Coverage`] derivation |
//! | [`preprocessing`] | Frame-to-tensor conversion for the ONNX backend |
//! | [`error`] | Error types ([`PoseError`], [`Result`]) |
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `backend-ort` | ONNX Runtime landmark model backend (default) |

// Modules
pub mod classifier;
pub mod cli;
pub mod decoder;
pub mod detector;
pub mod error;
pub mod landmark;
pub mod preprocessing;

// Re-export main types for convenience
pub use classifier::{Classification, Coverage};
pub use decoder::decode_frame;
pub use detector::{DetectorConfig, PoseEstimator, StubPose};
pub use error::{PoseError, Result};
pub use landmark::{BodyLandmark, LANDMARK_COUNT, Landmark, LandmarkSet, UPPER_BODY_LANDMARKS};

#[cfg(feature = "backend-ort")]
pub use detector::OnnxPoseModel;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
