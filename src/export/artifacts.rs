//! Persisted training outputs and their on-disk layout

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PodcastError, Result};
use crate::preprocessing::{CategoryEncoderSet, ImputationTable};
use crate::schema;
use crate::training::{LinearRegression, Regressor};

use super::serializer::{load_artifact, save_artifact, ArtifactKind};

/// File layout under an artifacts directory
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactPaths {
    pub dir: PathBuf,
}

impl ArtifactPaths {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn model(&self) -> PathBuf {
        self.dir.join("model.bin")
    }

    pub fn imputation(&self) -> PathBuf {
        self.dir.join("imputation.bin")
    }

    pub fn encoders(&self) -> PathBuf {
        self.dir.join("encoders.bin")
    }

    /// UI dropdown side-file
    pub fn categories(&self) -> PathBuf {
        self.dir.join("categories.json")
    }
}

/// Model metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Model name
    pub name: String,
    /// Crate version that trained the model
    pub version: String,
    /// Training timestamp (RFC 3339)
    pub trained_at: String,
    /// Input columns in order
    pub feature_names: Vec<String>,
    /// Target name
    pub target_name: String,
}

/// Fitted regressor plus metadata, immutable once built
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub metadata: ModelMetadata,
    pub model: LinearRegression,
}

impl ModelArtifact {
    pub fn new(model: LinearRegression, target_name: impl Into<String>) -> Self {
        Self {
            metadata: ModelMetadata {
                name: model.name().to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                trained_at: chrono::Utc::now().to_rfc3339(),
                feature_names: schema::feature_names(),
                target_name: target_name.into(),
            },
            model,
        }
    }

    /// Load and check the artifact against the canonical feature order
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let artifact: ModelArtifact = load_artifact(ArtifactKind::Model, path)?;

        if artifact.metadata.feature_names != schema::feature_names() {
            return Err(PodcastError::artifact(
                path,
                "feature order does not match this build",
            ));
        }
        if !artifact.model.is_fitted || artifact.model.n_features() != Some(schema::FEATURE_COLUMNS.len()) {
            return Err(PodcastError::artifact(path, "model is not fitted for this feature set"));
        }
        Ok(artifact)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        save_artifact(self, ArtifactKind::Model, path)
    }
}

/// Everything a training run persists, minus the metrics file
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactBundle {
    pub imputation: ImputationTable,
    pub encoders: CategoryEncoderSet,
    pub model: ModelArtifact,
}

impl ArtifactBundle {
    pub fn save(&self, paths: &ArtifactPaths) -> Result<()> {
        save_artifact(&self.imputation, ArtifactKind::Imputation, paths.imputation())?;
        save_artifact(&self.encoders, ArtifactKind::Encoders, paths.encoders())?;
        self.model.save(paths.model())?;
        Ok(())
    }

    /// Load all three artifacts; any failure aborts
    pub fn load(paths: &ArtifactPaths) -> Result<Self> {
        let imputation: ImputationTable = load_artifact(ArtifactKind::Imputation, paths.imputation())?;
        let encoders: CategoryEncoderSet = load_artifact(ArtifactKind::Encoders, paths.encoders())?;

        for column in schema::CATEGORICAL_FEATURES {
            if encoders.get(column).is_none() {
                return Err(PodcastError::artifact(
                    paths.encoders(),
                    format!("no encoder for column {}", column),
                ));
            }
        }

        let model = ModelArtifact::load(paths.model())?;
        Ok(Self { imputation, encoders, model })
    }
}
