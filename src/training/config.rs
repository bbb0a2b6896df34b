//! Training configuration

use crate::error::{PodcastError, Result};
use crate::schema::TARGET_COLUMN;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Configuration for the training pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Raw training table (CSV)
    pub data_path: PathBuf,

    /// Target column name
    pub target_column: String,

    /// Number of cross-validation folds
    pub n_splits: usize,

    /// Seed for the fold shuffle
    pub random_state: u64,

    /// L2 regularization strength (0 = ordinary least squares)
    pub alpha: f64,

    /// Directory receiving model, imputation and encoder artifacts
    pub artifacts_dir: PathBuf,

    /// Cross-validation metrics JSON
    pub metrics_path: PathBuf,

    /// CSV rows scanned for schema inference (None = all rows)
    pub infer_schema_length: Option<usize>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/raw/train.csv"),
            target_column: TARGET_COLUMN.to_string(),
            n_splits: 5,
            random_state: 42,
            alpha: 0.0,
            artifacts_dir: PathBuf::from("model"),
            metrics_path: PathBuf::from("metrics/model_metrics_lr.json"),
            infer_schema_length: None,
        }
    }
}

impl TrainingConfig {
    pub fn new(data_path: impl Into<PathBuf>) -> Self {
        Self {
            data_path: data_path.into(),
            ..Default::default()
        }
    }

    pub fn with_target(mut self, target: impl Into<String>) -> Self {
        self.target_column = target.into();
        self
    }

    pub fn with_n_splits(mut self, n_splits: usize) -> Self {
        self.n_splits = n_splits;
        self
    }

    pub fn with_random_state(mut self, seed: u64) -> Self {
        self.random_state = seed;
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_artifacts_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artifacts_dir = dir.into();
        self
    }

    pub fn with_metrics_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.metrics_path = path.into();
        self
    }

    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Reject settings the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.n_splits < 2 {
            return Err(PodcastError::ConfigError(format!(
                "n_splits must be at least 2, got {}",
                self.n_splits
            )));
        }
        if !(self.alpha >= 0.0 && self.alpha.is_finite()) {
            return Err(PodcastError::ConfigError(format!(
                "alpha must be a non-negative number, got {}",
                self.alpha
            )));
        }
        if self.infer_schema_length == Some(0) {
            return Err(PodcastError::ConfigError(
                "infer_schema_length must be at least 1 row".to_string(),
            ));
        }
        if self.target_column.is_empty() {
            return Err(PodcastError::ConfigError(
                "target column must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrainingConfig::default();
        assert_eq!(config.n_splits, 5);
        assert_eq!(config.random_state, 42);
        assert_eq!(config.target_column, "Listening_Time_minutes");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(TrainingConfig::default().with_n_splits(1).validate().is_err());
        assert!(TrainingConfig::default().with_alpha(-1.0).validate().is_err());
        assert!(TrainingConfig::default().with_alpha(f64::NAN).validate().is_err());
        assert!(TrainingConfig::default().with_infer_schema_length(Some(0)).validate().is_err());
        assert!(TrainingConfig::default().with_infer_schema_length(Some(100)).validate().is_ok());
    }
}
