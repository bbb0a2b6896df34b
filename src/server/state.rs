//! Read-only service context shared by every handler

use std::path::PathBuf;

use crate::error::Result;
use crate::export::ArtifactPaths;
use crate::inference::{InferenceStats, Predictor};
use crate::utils::DropdownCategories;

use super::ServerConfig;

/// Artifacts loaded once at startup plus request counters
pub struct ServiceContext {
    pub predictor: Predictor,
    pub stats: InferenceStats,
    pub categories: Option<DropdownCategories>,
}

impl ServiceContext {
    /// Load artifacts from `config.artifacts_dir`; fails fast on any artifact error
    pub fn load(config: &ServerConfig) -> Result<Self> {
        let paths = ArtifactPaths::new(&config.artifacts_dir);
        let predictor = Predictor::load(&paths)?;
        let categories = load_categories(paths.categories());
        Ok(Self::with_predictor(predictor, categories))
    }

    fn with_predictor(predictor: Predictor, categories: Option<DropdownCategories>) -> Self {
        Self {
            predictor,
            stats: InferenceStats::new(),
            categories,
        }
    }
}

/// The dropdown side-file is optional; a missing or broken file only disables `/categories`
fn load_categories(path: PathBuf) -> Option<DropdownCategories> {
    if !path.exists() {
        return None;
    }
    match DropdownCategories::load(&path) {
        Ok(categories) => Some(categories),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "Ignoring unreadable categories file");
            None
        }
    }
}
