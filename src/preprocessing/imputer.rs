//! Missing value imputation learned from the training table

use crate::error::{PodcastError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

use super::record::{FieldValue, RawRecord};
use crate::utils::is_numeric_dtype;

/// Per-column fallback values: numeric median, categorical mode.
///
/// Frozen after [`ImputationTable::fit`]; shared read-only by every transform.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImputationTable {
    numerical_median: BTreeMap<String, f64>,
    categorical_mode: BTreeMap<String, String>,
}

impl ImputationTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a numeric fallback
    pub fn with_median(mut self, column: impl Into<String>, median: f64) -> Self {
        self.numerical_median.insert(column.into(), median);
        self
    }

    /// Insert a categorical fallback
    pub fn with_mode(mut self, column: impl Into<String>, mode: impl Into<String>) -> Self {
        self.categorical_mode.insert(column.into(), mode.into());
        self
    }

    /// Learn medians and modes from every column except `exclude`.
    ///
    /// Integer and float columns get a median; string columns get a mode.
    /// Columns without a single non-null value get no entry.
    pub fn fit(df: &DataFrame, exclude: &[&str]) -> Result<Self> {
        let mut table = Self::new();

        for col in df.get_columns() {
            let name = col.name().to_string();
            if exclude.contains(&name.as_str()) {
                continue;
            }
            let series = col.as_materialized_series();

            if is_numeric_dtype(series.dtype()) {
                let median = series
                    .cast(&DataType::Float64)?
                    .f64()
                    .map_err(|e| PodcastError::DataError(e.to_string()))?
                    .median();
                if let Some(median) = median {
                    table.numerical_median.insert(name, median);
                }
            } else if series.dtype() == &DataType::String {
                if let Some(mode) = compute_mode_string(series)? {
                    table.categorical_mode.insert(name, mode);
                }
            } else {
                debug!(column = %name, dtype = ?series.dtype(), "Skipping column with unsupported dtype");
            }
        }

        debug!(
            numeric = table.numerical_median.len(),
            categorical = table.categorical_mode.len(),
            "Fitted imputation table"
        );
        Ok(table)
    }

    pub fn median(&self, column: &str) -> Option<f64> {
        self.numerical_median.get(column).copied()
    }

    pub fn mode(&self, column: &str) -> Option<&str> {
        self.categorical_mode.get(column).map(String::as_str)
    }

    /// Fallback value for `column`, whichever kind it has
    pub fn fallback(&self, column: &str) -> Option<FieldValue> {
        self.median(column)
            .map(FieldValue::Number)
            .or_else(|| self.mode(column).map(FieldValue::from))
    }

    pub fn numerical_median(&self) -> &BTreeMap<String, f64> {
        &self.numerical_median
    }

    pub fn categorical_mode(&self) -> &BTreeMap<String, String> {
        &self.categorical_mode
    }

    /// Replace nulls in known columns.
    ///
    /// Columns the record does not carry are left absent; columns the table
    /// does not know pass through untouched.
    pub fn apply(&self, record: &mut RawRecord) {
        for (column, median) in &self.numerical_median {
            if let Some(value) = record.get_mut(column) {
                if value.is_null() {
                    *value = FieldValue::Number(*median);
                }
            }
        }
        for (column, mode) in &self.categorical_mode {
            if let Some(value) = record.get_mut(column) {
                if value.is_null() {
                    *value = FieldValue::Text(mode.clone());
                }
            }
        }
    }
}

/// Most frequent value; ties go to the lexicographically smallest
fn compute_mode_string(series: &Series) -> Result<Option<String>> {
    let ca = series
        .str()
        .map_err(|e| PodcastError::DataError(e.to_string()))?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for val in ca.into_iter().flatten() {
        *counts.entry(val).or_insert(0) += 1;
    }

    let mode = counts
        .into_iter()
        .max_by(|(a, ca), (b, cb)| ca.cmp(cb).then_with(|| b.cmp(a)))
        .map(|(k, _)| k.to_string());

    Ok(mode)
}
