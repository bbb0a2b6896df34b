//! Label encoding with a sorted, frozen vocabulary

use crate::error::{PodcastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Label encoder for a single column.
///
/// Codes are positions in the sorted vocabulary. Values unseen during fit
/// encode as the first class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    /// Fit over every value of a column
    pub fn fit<I, S>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let classes: BTreeSet<String> = values
            .into_iter()
            .map(|v| v.as_ref().to_string())
            .collect();

        if classes.is_empty() {
            return Err(PodcastError::ValidationError(
                "cannot fit a label encoder on zero values".to_string(),
            ));
        }

        Ok(Self {
            classes: classes.into_iter().collect(),
        })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Class substituted for unseen values
    pub fn fallback_class(&self) -> &str {
        // fit rejects empty vocabularies
        self.classes.first().map(String::as_str).unwrap_or_default()
    }

    /// Code of a known value
    pub fn code_of(&self, value: &str) -> Option<usize> {
        self.classes
            .binary_search_by(|c| c.as_str().cmp(value))
            .ok()
    }

    /// Encode a value, reporting whether the fallback was used
    pub fn encode(&self, value: &str) -> (usize, bool) {
        match self.code_of(value) {
            Some(code) => (code, false),
            None => (0, true),
        }
    }
}

/// Fitted encoders keyed by column name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryEncoderSet {
    encoders: BTreeMap<String, LabelEncoder>,
}

impl CategoryEncoderSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, encoder: LabelEncoder) {
        self.encoders.insert(column.into(), encoder);
    }

    pub fn get(&self, column: &str) -> Option<&LabelEncoder> {
        self.encoders.get(column)
    }

    /// Encoder for `column`, or `ModelNotFitted` when absent
    pub fn require(&self, column: &str) -> Result<&LabelEncoder> {
        self.encoders.get(column).ok_or_else(|| {
            tracing::error!(column = %column, "No fitted encoder for column");
            PodcastError::ModelNotFitted
        })
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.encoders.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.encoders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encoders.is_empty()
    }
}
