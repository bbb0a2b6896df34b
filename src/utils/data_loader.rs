//! Data loading utilities

use crate::error::{PodcastError, Result};
use crate::preprocessing::{FieldValue, RawRecord};
use crate::schema;
use crate::utils::is_numeric_dtype;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::File;
use std::path::Path;
use std::time::Instant;
use tracing::info;

/// CSV loader for the raw episode table
#[derive(Debug, Clone)]
pub struct DataLoader {
    /// Rows scanned for schema inference (None = all rows)
    infer_schema_length: Option<usize>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    /// Create a new data loader
    pub fn new() -> Self {
        Self {
            infer_schema_length: None,
        }
    }

    pub fn with_infer_schema_length(mut self, rows: Option<usize>) -> Self {
        self.infer_schema_length = rows;
        self
    }

    /// Load a CSV file
    pub fn load_csv(&self, path: impl AsRef<Path>) -> Result<DataFrame> {
        let path = path.as_ref();
        let start = Instant::now();
        let file = File::open(path).map_err(|e| {
            PodcastError::DataError(format!("cannot open {}: {}", path.display(), e))
        })?;

        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(self.infer_schema_length)
            .into_reader_with_file_handle(file)
            .finish()
            .map_err(|e| PodcastError::DataError(e.to_string()))?;

        info!(
            path = %path.display(),
            rows = df.height(),
            cols = df.width(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Loaded CSV"
        );
        Ok(df)
    }
}

/// Convert every row of `df` into a [`RawRecord`], skipping `exclude` columns
pub fn records_from_frame(df: &DataFrame, exclude: &[&str]) -> Result<Vec<RawRecord>> {
    let mut records = vec![RawRecord::new(); df.height()];

    for col in df.get_columns() {
        let name = col.name().to_string();
        if exclude.contains(&name.as_str()) {
            continue;
        }
        let values = column_values(col.as_materialized_series())?;
        for (record, value) in records.iter_mut().zip(values) {
            record.insert(name.clone(), value);
        }
    }

    Ok(records)
}

/// Require every raw field and read the numeric ones as f64.
///
/// Polars infers an all-empty or text-polluted numeric column as a string
/// column; the non-strict cast turns its unparsable cells into nulls.
pub fn conform_frame(df: &DataFrame) -> Result<DataFrame> {
    let missing: Vec<&str> = schema::RAW_FIELDS
        .iter()
        .copied()
        .filter(|name| df.column(name).is_err())
        .collect();
    if !missing.is_empty() {
        return Err(PodcastError::DataError(format!(
            "training data is missing columns: {}",
            missing.join(", ")
        )));
    }

    let mut conformed = df.clone();
    for name in schema::NUMERIC_FIELDS {
        let series = conformed
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        conformed.with_column(series)?;
    }
    Ok(conformed)
}

/// Numeric column as f64, rejecting nulls
pub fn target_vector(df: &DataFrame, target: &str) -> Result<ndarray::Array1<f64>> {
    let series = df
        .column(target)
        .map_err(|_| PodcastError::DataError(format!("target column {} not found", target)))?
        .as_materialized_series()
        .cast(&DataType::Float64)?;

    let ca = series.f64().map_err(|e| PodcastError::DataError(e.to_string()))?;
    ca.into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.filter(|v| v.is_finite()).ok_or_else(|| {
                PodcastError::DataError(format!("target {} is missing at row {}", target, row))
            })
        })
        .collect()
}

fn column_values(series: &Series) -> Result<Vec<FieldValue>> {
    let values = match series.dtype() {
        DataType::String => series
            .str()
            .map_err(|e| PodcastError::DataError(e.to_string()))?
            .into_iter()
            .map(|v| v.map(FieldValue::from).unwrap_or(FieldValue::Null))
            .collect(),
        dtype if is_numeric_dtype(dtype) => series
            .cast(&DataType::Float64)?
            .f64()
            .map_err(|e| PodcastError::DataError(e.to_string()))?
            .into_iter()
            .map(|v| v.map(FieldValue::from).unwrap_or(FieldValue::Null))
            .collect(),
        _ => series
            .cast(&DataType::String)?
            .str()
            .map_err(|e| PodcastError::DataError(e.to_string()))?
            .into_iter()
            .map(|v| v.map(FieldValue::from).unwrap_or(FieldValue::Null))
            .collect(),
    };
    Ok(values)
}

/// Dropdown values for the prediction form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropdownCategories {
    pub podcasts: Vec<String>,
    pub titles: Vec<String>,
    pub genres: Vec<String>,
    pub days: Vec<String>,
}

impl DropdownCategories {
    /// Sorted distinct values of the raw categorical columns
    pub fn from_frame(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            podcasts: distinct_strings(df, schema::PODCAST_NAME)?,
            titles: distinct_strings(df, schema::EPISODE_TITLE)?,
            genres: distinct_strings(df, schema::GENRE)?,
            days: distinct_strings(df, schema::PUBLICATION_DAY)?,
        })
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

fn distinct_strings(df: &DataFrame, column: &str) -> Result<Vec<String>> {
    let series = df
        .column(column)
        .map_err(|_| PodcastError::DataError(format!("column {} not found", column)))?
        .as_materialized_series()
        .cast(&DataType::String)?;

    let values: BTreeSet<String> = series
        .str()
        .map_err(|e| PodcastError::DataError(e.to_string()))?
        .into_iter()
        .flatten()
        .map(str::to_string)
        .collect();

    Ok(values.into_iter().collect())
}
