//! Podcast listening-time predictor
//!
//! Predicts how long listeners stay with a podcast episode from its
//! metadata. The crate provides:
//! - A fixed feature-transformation contract shared by training and serving
//! - A batch training pipeline with K-fold cross-validation
//! - An HTTP inference service and CLI
//!
//! # Modules
//!
//! ## Core
//! - [`schema`] - Column names and canonical feature order
//! - [`preprocessing`] - Raw records, imputation, label encoding
//! - [`feature_engineering`] - Derived features and the shared transformer
//!
//! ## Training & Inference
//! - [`training`] - Cross-validation, linear regression, training pipeline
//! - [`export`] - Checksummed artifact persistence
//! - [`inference`] - Transform-then-predict core
//!
//! ## Services
//! - [`server`] - HTTP server
//! - [`cli`] - Command-line interface

// Core error handling
pub mod error;

// Core
pub mod schema;
pub mod preprocessing;
pub mod feature_engineering;

// Training & inference
pub mod training;
pub mod export;
pub mod inference;

// Utilities
pub mod utils;

// Services
pub mod server;
pub mod cli;

pub use error::{PodcastError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{PodcastError, Result};

    // Preprocessing
    pub use crate::preprocessing::{CategoryEncoderSet, FieldValue, ImputationTable, LabelEncoder, RawRecord};

    // Feature engineering
    pub use crate::feature_engineering::{FeatureMatrix, FeatureTransformer, TransformMode, TransformReport};

    // Training
    pub use crate::training::{
        CrossValidationReport, LinearRegression, Regressor, TrainingConfig, TrainingPipeline,
    };

    // Export
    pub use crate::export::{ArtifactBundle, ArtifactPaths, ModelArtifact};

    // Inference
    pub use crate::inference::{Prediction, Predictor};
}
