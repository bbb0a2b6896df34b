//! Cross-validation report and its JSON file

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::models::ModelMetrics;

/// Scores for one fold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoldMetrics {
    pub fold: usize,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
    pub n_train: usize,
    pub n_validation: usize,
}

impl FoldMetrics {
    pub fn new(fold: usize, metrics: &ModelMetrics, n_train: usize) -> Self {
        Self {
            fold,
            rmse: metrics.rmse,
            mae: metrics.mae,
            r2: metrics.r2,
            n_train,
            n_validation: metrics.n_samples,
        }
    }
}

/// Per-fold scores plus their means
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossValidationReport {
    pub model: String,
    #[serde(rename = "RMSE")]
    pub rmse: f64,
    #[serde(rename = "MAE")]
    pub mae: f64,
    #[serde(rename = "R2")]
    pub r2: f64,
    pub n_splits: usize,
    pub random_state: u64,
    pub folds: Vec<FoldMetrics>,
}

impl CrossValidationReport {
    /// Average fold scores; `folds` must be in fold order
    pub fn from_folds(model: impl Into<String>, random_state: u64, folds: Vec<FoldMetrics>) -> Self {
        let n = folds.len().max(1) as f64;
        let mean = |f: fn(&FoldMetrics) -> f64| folds.iter().map(f).sum::<f64>() / n;

        Self {
            model: model.into(),
            rmse: mean(|f| f.rmse),
            mae: mean(|f| f.mae),
            r2: mean(|f| f.r2),
            n_splits: folds.len(),
            random_state,
            folds,
        }
    }

    /// Write pretty JSON, creating parent directories
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(i: usize, rmse: f64) -> FoldMetrics {
        FoldMetrics { fold: i, rmse, mae: rmse / 2.0, r2: 0.5, n_train: 8, n_validation: 2 }
    }

    #[test]
    fn test_report_means() {
        let report = CrossValidationReport::from_folds("Linear Regression", 42, vec![fold(0, 1.0), fold(1, 3.0)]);
        assert_eq!(report.rmse, 2.0);
        assert_eq!(report.mae, 1.0);
        assert_eq!(report.r2, 0.5);
        assert_eq!(report.n_splits, 2);
    }

    #[test]
    fn test_report_json_keys() {
        let report = CrossValidationReport::from_folds("Linear Regression", 42, vec![fold(0, 1.0)]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["model"], "Linear Regression");
        assert!(value.get("RMSE").is_some());
        assert!(value.get("MAE").is_some());
        assert!(value.get("R2").is_some());
        assert_eq!(value["folds"][0]["fold"], 0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("metrics").join("model_metrics_lr.json");
        let report = CrossValidationReport::from_folds("Linear Regression", 42, vec![fold(0, 1.5)]);

        report.save(&path).unwrap();
        assert_eq!(CrossValidationReport::load(&path).unwrap(), report);
    }
}
