// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the pose visibility library.

use std::fmt;

/// Result type alias for pose operations.
pub type Result<T> = std::result::Result<T, PoseError>;

/// Main error type for the pose visibility library.
#[derive(Debug)]
pub enum PoseError {
    /// Error loading the ONNX landmark model.
    ModelLoadError(String),
    /// Error during model inference.
    InferenceError(String),
    /// Error processing images.
    ImageError(String),
    /// Malformed landmark output (wrong count, bad tensor shape).
    LandmarkError(String),
    /// Invalid configuration provided.
    ConfigError(String),
    /// Wrapped `std::io::Error`.
    Io(std::io::Error),
}

impl fmt::Display for PoseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModelLoadError(msg) => write!(f, "Model load error: {msg}"),
            Self::InferenceError(msg) => write!(f, "Inference error: {msg}"),
            Self::ImageError(msg) => write!(f, "Image error: {msg}"),
            Self::LandmarkError(msg) => write!(f, "Landmark error: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
        }
    }
}

impl std::error::Error for PoseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for PoseError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<image::ImageError> for PoseError {
    fn from(err: image::ImageError) -> Self {
        Self::ImageError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = PoseError::ModelLoadError("test".to_string());
        assert_eq!(err.to_string(), "Model load error: test");

        let err = PoseError::LandmarkError("test".to_string());
        assert_eq!(err.to_string(), "Landmark error: test");
    }

    #[test]
    fn test_io_error_source() {
        let err = PoseError::from(std::io::Error::new(std::io::ErrorKind::NotFound, "missing"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
