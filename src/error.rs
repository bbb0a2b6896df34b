//! Error types for the podcast listening-time predictor

use thiserror::Error;

/// Result type alias for crate operations
pub type Result<T> = std::result::Result<T, PodcastError>;

/// Main error type for the crate
#[derive(Error, Debug)]
pub enum PodcastError {
    #[error("Missing field: {0}")]
    MissingField(String),

    #[error("Failed to load artifact {path}: {reason}")]
    ArtifactLoad { path: String, reason: String },

    #[error("Prediction error: {0}")]
    Prediction(String),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Training error: {0}")]
    TrainingError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("Invalid shape: expected {expected}, got {actual}")]
    ShapeError { expected: String, actual: String },

    #[error("Model not fitted")]
    ModelNotFitted,

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Computation error: {0}")]
    ComputationError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl PodcastError {
    /// Build an artifact load error for `path`
    pub fn artifact(path: impl AsRef<std::path::Path>, reason: impl Into<String>) -> Self {
        PodcastError::ArtifactLoad {
            path: path.as_ref().display().to_string(),
            reason: reason.into(),
        }
    }
}

impl From<polars::error::PolarsError> for PodcastError {
    fn from(err: polars::error::PolarsError) -> Self {
        PodcastError::DataError(err.to_string())
    }
}

impl From<serde_json::Error> for PodcastError {
    fn from(err: serde_json::Error) -> Self {
        PodcastError::SerializationError(err.to_string())
    }
}

impl From<bincode::Error> for PodcastError {
    fn from(err: bincode::Error) -> Self {
        PodcastError::SerializationError(err.to_string())
    }
}

impl From<ndarray::ShapeError> for PodcastError {
    fn from(err: ndarray::ShapeError) -> Self {
        PodcastError::ShapeError {
            expected: "valid shape".to_string(),
            actual: err.to_string(),
        }
    }
}
