//! Raw episode records
//!
//! A [`RawRecord`] is one episode as it arrives from the training table or
//! from an inference payload, before any imputation or feature derivation.

use crate::error::{PodcastError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single scalar field value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Null,
    Number(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Read the value as a number.
    ///
    /// Null reads as `NaN`; text must parse as `f64`.
    pub fn as_number(&self, field: &str) -> Result<f64> {
        match self {
            FieldValue::Null => Ok(f64::NAN),
            FieldValue::Number(v) => Ok(*v),
            FieldValue::Text(s) => s.trim().parse::<f64>().map_err(|_| {
                PodcastError::InvalidInput(format!(
                    "field {} expects a number, got {:?}",
                    field, s
                ))
            }),
        }
    }

    /// Read the value as a category label.
    ///
    /// Numbers use the shortest `f64` display (`0.5`, `1`); null reads as `"nan"`.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Null => "nan".to_string(),
            FieldValue::Number(v) => v.to_string(),
            FieldValue::Text(s) => s.clone(),
        }
    }

    fn from_json(field: &str, value: &serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::Null => Ok(FieldValue::Null),
            serde_json::Value::Number(n) => Ok(n
                .as_f64()
                .filter(|v| v.is_finite())
                .map(FieldValue::Number)
                .unwrap_or(FieldValue::Null)),
            serde_json::Value::String(s) => Ok(FieldValue::Text(s.clone())),
            serde_json::Value::Bool(b) => Ok(FieldValue::Text(b.to_string())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => {
                Err(PodcastError::InvalidInput(format!(
                    "field {} must be a scalar",
                    field
                )))
            }
        }
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        if v.is_finite() {
            FieldValue::Number(v)
        } else {
            FieldValue::Null
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

/// One episode: field name to scalar value
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn get_mut(&mut self, field: &str) -> Option<&mut FieldValue> {
        self.fields.get_mut(field)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<FieldValue> {
        self.fields.remove(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Build a record from a JSON object
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        let object = value.as_object().ok_or_else(|| {
            PodcastError::InvalidInput("request body must be a JSON object".to_string())
        })?;

        let mut record = RawRecord::new();
        for (field, raw) in object {
            record.insert(field.clone(), FieldValue::from_json(field, raw)?);
        }
        Ok(record)
    }
}
