//! Model training module
//!
//! Provides the batch training side of the predictor:
//! - Training configuration
//! - Shuffled K-fold cross-validation
//! - Linear regression (OLS, optional ridge) behind the [`Regressor`] trait
//! - Regression metrics and the cross-validation report
//! - The end-to-end [`TrainingPipeline`]

mod config;
mod metrics;
mod models;
mod pipeline;
pub mod cross_validation;
pub mod linear_models;

pub use config::TrainingConfig;
pub use cross_validation::{CVSplit, CVStrategy, CrossValidator};
pub use linear_models::LinearRegression;
pub use metrics::{CrossValidationReport, FoldMetrics};
pub use models::{ModelMetrics, Regressor};
pub use pipeline::{cross_validate, TrainingOutcome, TrainingPipeline};
