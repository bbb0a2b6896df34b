//! End-to-end training: raw table to persisted artifacts

use crate::error::{PodcastError, Result};
use crate::export::{ArtifactBundle, ArtifactPaths, ModelArtifact};
use crate::feature_engineering::FeatureTransformer;
use crate::preprocessing::ImputationTable;
use crate::schema::ID_COLUMN;
use crate::utils::{conform_frame, records_from_frame, target_vector, DataLoader};
use ndarray::{Array1, Array2, Axis};
use polars::prelude::DataFrame;
use rayon::prelude::*;
use std::time::Instant;
use tracing::info;

use super::config::TrainingConfig;
use super::cross_validation::{CVStrategy, CrossValidator};
use super::linear_models::LinearRegression;
use super::metrics::{CrossValidationReport, FoldMetrics};
use super::models::{ModelMetrics, Regressor};

/// Result of one training run
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub bundle: ArtifactBundle,
    pub report: CrossValidationReport,
    pub n_samples: usize,
}

/// Load → impute → transform → cross-validate → refit → persist
pub struct TrainingPipeline {
    config: TrainingConfig,
}

impl TrainingPipeline {
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrainingConfig {
        &self.config
    }

    /// Run on the configured CSV and write every artifact
    pub fn run(&self) -> Result<TrainingOutcome> {
        self.config.validate()?;
        if !self.config.data_path.exists() {
            return Err(PodcastError::DataError(format!(
                "training data not found: {}",
                self.config.data_path.display()
            )));
        }

        let df = DataLoader::new()
            .with_infer_schema_length(self.config.infer_schema_length)
            .load_csv(&self.config.data_path)?;
        let outcome = self.fit_frame(&df)?;
        self.persist(&outcome)?;
        Ok(outcome)
    }

    /// Fit everything from an in-memory table without touching disk
    pub fn fit_frame(&self, df: &DataFrame) -> Result<TrainingOutcome> {
        self.config.validate()?;
        let start = Instant::now();
        let target = self.config.target_column.as_str();

        let y = target_vector(df, target)?;
        let df = conform_frame(df)?;
        let imputation = ImputationTable::fit(&df, &[target])?;
        info!(
            numeric = imputation.numerical_median().len(),
            categorical = imputation.categorical_mode().len(),
            "Fitted imputation table"
        );

        let records = records_from_frame(&df, &[ID_COLUMN, target])?;
        let mut transformer = FeatureTransformer::new(imputation);
        let matrix = transformer.fit_transform(&records)?;
        info!(rows = matrix.n_rows(), features = matrix.columns.len(), "Built feature matrix");

        let template = LinearRegression::new().with_alpha(self.config.alpha);
        let report = cross_validate(
            &template,
            &matrix.values,
            &y,
            self.config.n_splits,
            self.config.random_state,
        )?;
        info!(
            model = %report.model,
            rmse = report.rmse,
            mae = report.mae,
            r2 = report.r2,
            "Cross-validation finished"
        );

        let mut model = template;
        model.fit(&matrix.values, &y)?;

        let (imputation, encoders) = transformer.into_parts();
        let bundle = ArtifactBundle {
            imputation,
            encoders,
            model: ModelArtifact::new(model, target),
        };

        info!(
            samples = y.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Training finished"
        );
        Ok(TrainingOutcome {
            bundle,
            report,
            n_samples: y.len(),
        })
    }

    /// Write artifacts and the metrics file
    pub fn persist(&self, outcome: &TrainingOutcome) -> Result<()> {
        let paths = ArtifactPaths::new(&self.config.artifacts_dir);
        outcome.bundle.save(&paths)?;
        outcome.report.save(&self.config.metrics_path)?;
        info!(
            artifacts = %paths.dir.display(),
            metrics = %self.config.metrics_path.display(),
            "Saved artifacts"
        );
        Ok(())
    }
}

/// Shuffled K-fold evaluation of a regressor template.
///
/// Folds run in parallel; the report lists them in fold order.
pub fn cross_validate<R>(
    template: &R,
    x: &Array2<f64>,
    y: &Array1<f64>,
    n_splits: usize,
    random_state: u64,
) -> Result<CrossValidationReport>
where
    R: Regressor + Clone,
{
    if x.nrows() != y.len() {
        return Err(PodcastError::ShapeError {
            expected: format!("{} targets", x.nrows()),
            actual: format!("{} targets", y.len()),
        });
    }

    let splits = CrossValidator::new(CVStrategy::KFold { n_splits, shuffle: true })
        .with_random_state(random_state)
        .split(x.nrows())?;

    let folds = splits
        .par_iter()
        .map(|split| {
            let x_train = x.select(Axis(0), &split.train_indices);
            let y_train = y.select(Axis(0), &split.train_indices);
            let x_test = x.select(Axis(0), &split.test_indices);
            let y_test = y.select(Axis(0), &split.test_indices);

            let mut model = template.clone();
            model.fit(&x_train, &y_train)?;
            let y_pred = model.predict(&x_test)?;

            let metrics = ModelMetrics::compute_regression(&y_test, &y_pred);
            tracing::debug!(fold = split.fold_idx, rmse = metrics.rmse, r2 = metrics.r2, "Fold scored");
            Ok(FoldMetrics::new(split.fold_idx, &metrics, split.train_indices.len()))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CrossValidationReport::from_folds(template.name(), random_state, folds))
}
