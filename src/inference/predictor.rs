//! Transform-then-predict for raw episode records

use crate::error::{PodcastError, Result};
use crate::export::{ArtifactBundle, ArtifactPaths, ModelArtifact};
use crate::feature_engineering::{FeatureTransformer, TransformReport};
use crate::preprocessing::RawRecord;
use crate::training::Regressor;
use crate::utils::round_to;
use serde::{Deserialize, Serialize};

/// Decimal places of a reported prediction
pub const PREDICTION_DECIMALS: i32 = 2;

/// One served prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub listening_time_minutes: f64,
    #[serde(skip)]
    pub report: TransformReport,
}

/// Persisted transformer and model, applied read-only
#[derive(Debug, Clone)]
pub struct Predictor {
    transformer: FeatureTransformer,
    model: ModelArtifact,
}

impl Predictor {
    pub fn new(bundle: ArtifactBundle) -> Self {
        Self {
            transformer: FeatureTransformer::from_parts(bundle.imputation, bundle.encoders),
            model: bundle.model,
        }
    }

    /// Load every artifact from `paths`
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        Ok(Self::new(ArtifactBundle::load(paths)?))
    }

    pub fn transformer(&self) -> &FeatureTransformer {
        &self.transformer
    }

    pub fn model(&self) -> &ModelArtifact {
        &self.model
    }

    /// Serve-mode transform, predict, clamp at zero, round to two decimals
    pub fn predict_record(&self, record: &RawRecord) -> Result<Prediction> {
        let (matrix, report) = self.transformer.transform_one(record)?;

        let raw = self
            .model
            .model
            .predict(&matrix.values)
            .map_err(|e| PodcastError::Prediction(e.to_string()))?
            .get(0)
            .copied()
            .ok_or_else(|| PodcastError::Prediction("model returned no output".to_string()))?;

        if !raw.is_finite() {
            return Err(PodcastError::Prediction(format!("non-finite prediction {}", raw)));
        }

        Ok(Prediction {
            listening_time_minutes: round_to(raw.max(0.0), PREDICTION_DECIMALS),
            report,
        })
    }

    /// Decode a JSON object and predict
    pub fn predict_json(&self, payload: &serde_json::Value) -> Result<Prediction> {
        let record = RawRecord::from_json(payload)?;
        self.predict_record(&record)
    }
}
