//! Shared feature transformation for training and serving
//!
//! [`FeatureTransformer`] turns raw records into the model's input matrix.
//! Fit mode and serve mode run the same per-record step
//! ([`FeatureTransformer::engineer_record`]) and differ only in whether
//! encoders are fit or applied, and in the training-only per-Genre fill.

use crate::error::{PodcastError, Result};
use crate::preprocessing::{CategoryEncoderSet, FieldValue, ImputationTable, LabelEncoder, RawRecord};
use crate::schema::{self, FEATURE_COLUMNS};
use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::derived::{self, DerivedFeatures};

/// Which call site is transforming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformMode {
    /// Training table: encoders are fit, per-Genre fill runs
    Fit,
    /// Inference: encoders are applied with fallback
    Serve,
}

/// One record after imputation and feature derivation, before encoding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeredRecord {
    pub podcast_name: String,
    pub episode_title: String,
    pub episode_length: f64,
    pub genre: String,
    pub host_popularity: f64,
    pub publication_day: String,
    pub publication_time: String,
    pub guest_popularity: f64,
    pub number_of_ads: f64,
    pub episode_sentiment: String,
    pub derived: DerivedFeatures,
}

impl EngineeredRecord {
    /// Label of a categorical feature column
    pub fn category(&self, column: &str) -> Option<&str> {
        let value = match column {
            schema::PODCAST_NAME => &self.podcast_name,
            schema::EPISODE_TITLE => &self.episode_title,
            schema::GENRE => &self.genre,
            schema::PUBLICATION_DAY => &self.publication_day,
            schema::PUBLICATION_TIME => &self.publication_time,
            schema::EPISODE_SENTIMENT => &self.episode_sentiment,
            schema::LENGTH_BUCKET => &self.derived.length_bucket,
            schema::GENRE_SENTIMENT => &self.derived.genre_sentiment,
            _ => return None,
        };
        Some(value.as_str())
    }

    /// Value of a numeric feature column
    pub fn numeric(&self, column: &str) -> Option<f64> {
        let value = match column {
            schema::EPISODE_LENGTH => self.episode_length,
            schema::HOST_POPULARITY => self.host_popularity,
            schema::GUEST_POPULARITY => self.guest_popularity,
            schema::NUMBER_OF_ADS => self.number_of_ads,
            schema::ADS_PER_MINUTE => self.derived.ads_per_minute,
            schema::IS_WEEKEND => self.derived.is_weekend,
            schema::IS_MORNING => self.derived.is_morning,
            schema::IS_NIGHT => self.derived.is_night,
            schema::SENTIMENT_SCORE => self.derived.sentiment_score,
            schema::POPULARITY_RATIO => self.derived.popularity_ratio,
            schema::EPISODE_NUMBER => self.derived.episode_number,
            _ => return None,
        };
        Some(value)
    }

    fn numeric_mut(&mut self, column: &str) -> Option<&mut f64> {
        match column {
            schema::EPISODE_LENGTH => Some(&mut self.episode_length),
            schema::GUEST_POPULARITY => Some(&mut self.guest_popularity),
            _ => None,
        }
    }
}

/// Unknown-category substitutions observed during one transform
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransformReport {
    pub unknown_categories: BTreeMap<String, usize>,
}

impl TransformReport {
    pub fn total_unknown(&self) -> usize {
        self.unknown_categories.values().sum()
    }

    fn record_unknown(&mut self, column: &str) {
        *self.unknown_categories.entry(column.to_string()).or_insert(0) += 1;
    }
}

/// Model input: rows in record order, columns in canonical order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub columns: Vec<String>,
    pub values: Array2<f64>,
}

impl FeatureMatrix {
    pub fn n_rows(&self) -> usize {
        self.values.nrows()
    }

    /// One column by name
    pub fn column(&self, name: &str) -> Option<Array1<f64>> {
        let idx = self.columns.iter().position(|c| c == name)?;
        Some(self.values.column(idx).to_owned())
    }
}

/// Imputation, derived features and encoding for the fixed podcast schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureTransformer {
    imputation: ImputationTable,
    encoders: CategoryEncoderSet,
}

impl FeatureTransformer {
    /// Unfitted transformer; encoders are learned by [`Self::fit_transform`]
    pub fn new(imputation: ImputationTable) -> Self {
        Self {
            imputation,
            encoders: CategoryEncoderSet::new(),
        }
    }

    /// Transformer built from persisted artifacts
    pub fn from_parts(imputation: ImputationTable, encoders: CategoryEncoderSet) -> Self {
        Self { imputation, encoders }
    }

    pub fn imputation(&self) -> &ImputationTable {
        &self.imputation
    }

    pub fn encoders(&self) -> &CategoryEncoderSet {
        &self.encoders
    }

    pub fn into_parts(self) -> (ImputationTable, CategoryEncoderSet) {
        (self.imputation, self.encoders)
    }

    /// Fit encoders over the training records and return their matrix
    pub fn fit_transform(&mut self, records: &[RawRecord]) -> Result<FeatureMatrix> {
        if records.is_empty() {
            return Err(PodcastError::ValidationError(
                "cannot fit on an empty training set".to_string(),
            ));
        }

        let rows = self.engineer(records, TransformMode::Fit)?;

        let mut encoders = CategoryEncoderSet::new();
        for column in schema::CATEGORICAL_FEATURES {
            let encoder = LabelEncoder::fit(rows.iter().filter_map(|r| r.category(column)))?;
            debug!(column = %column, classes = encoder.classes().len(), "Fitted label encoder");
            encoders.insert(column, encoder);
        }
        self.encoders = encoders;

        let (matrix, _) = self.assemble(&rows)?;
        Ok(matrix)
    }

    /// Apply persisted artifacts to records
    pub fn transform(&self, records: &[RawRecord]) -> Result<(FeatureMatrix, TransformReport)> {
        let rows = self.engineer(records, TransformMode::Serve)?;
        self.assemble(&rows)
    }

    /// Serve-mode transform of a single record
    pub fn transform_one(&self, record: &RawRecord) -> Result<(FeatureMatrix, TransformReport)> {
        self.transform(std::slice::from_ref(record))
    }

    /// Impute and derive features for every record, then run the
    /// training-only per-Genre fill when `mode` is [`TransformMode::Fit`].
    pub fn engineer(&self, records: &[RawRecord], mode: TransformMode) -> Result<Vec<EngineeredRecord>> {
        let mut rows = records
            .iter()
            .map(|r| self.engineer_record(r))
            .collect::<Result<Vec<_>>>()?;

        if mode == TransformMode::Fit {
            fill_genre_means(&mut rows);
        }
        Ok(rows)
    }

    /// Impute one record and compute its derived features
    pub fn engineer_record(&self, record: &RawRecord) -> Result<EngineeredRecord> {
        let mut record = record.clone();
        self.imputation.apply(&mut record);

        let podcast_name = self.read_text(&record, schema::PODCAST_NAME)?;
        let episode_title = self.read_text(&record, schema::EPISODE_TITLE)?;
        let episode_length = self.read_number(&record, schema::EPISODE_LENGTH)?;
        let genre = self.read_text(&record, schema::GENRE)?;
        let host_popularity = self.read_number(&record, schema::HOST_POPULARITY)?;
        let publication_day = self.read_text(&record, schema::PUBLICATION_DAY)?;
        let publication_time = self.read_text(&record, schema::PUBLICATION_TIME)?;
        let guest_popularity = self.read_number(&record, schema::GUEST_POPULARITY)?;
        let number_of_ads = self.read_number(&record, schema::NUMBER_OF_ADS)?;
        let episode_sentiment = self.read_text(&record, schema::EPISODE_SENTIMENT)?;

        let derived = DerivedFeatures {
            ads_per_minute: derived::ads_per_minute(number_of_ads, episode_length),
            is_weekend: derived::is_weekend(&publication_day),
            is_morning: derived::is_morning(&publication_time),
            is_night: derived::is_night(&publication_time),
            length_bucket: derived::length_bucket(episode_length).to_string(),
            sentiment_score: derived::sentiment_score(&episode_sentiment),
            popularity_ratio: derived::popularity_ratio(guest_popularity, host_popularity),
            episode_number: derived::episode_number(&episode_title),
            genre_sentiment: derived::genre_sentiment(&genre, &episode_sentiment),
        };

        Ok(EngineeredRecord {
            podcast_name,
            episode_title,
            episode_length,
            genre,
            host_popularity,
            publication_day,
            publication_time,
            guest_popularity,
            number_of_ads,
            episode_sentiment,
            derived,
        })
    }

    /// Field value after imputation; an absent field resolves through the table
    fn resolve(&self, record: &RawRecord, field: &str) -> Result<FieldValue> {
        match record.get(field) {
            Some(value) => Ok(value.clone()),
            None => self
                .imputation
                .fallback(field)
                .ok_or_else(|| PodcastError::MissingField(field.to_string())),
        }
    }

    fn read_number(&self, record: &RawRecord, field: &str) -> Result<f64> {
        self.resolve(record, field)?.as_number(field)
    }

    fn read_text(&self, record: &RawRecord, field: &str) -> Result<String> {
        Ok(self.resolve(record, field)?.as_text())
    }

    /// Encode categorical columns and lay rows out in canonical order
    fn assemble(&self, rows: &[EngineeredRecord]) -> Result<(FeatureMatrix, TransformReport)> {
        let mut report = TransformReport::default();
        let n_cols = FEATURE_COLUMNS.len();
        let mut flat = Vec::with_capacity(rows.len() * n_cols);

        for row in rows {
            for column in FEATURE_COLUMNS {
                let value = if schema::is_categorical(column) {
                    let encoder = self.encoders.require(column)?;
                    let label = row.category(column).unwrap_or_default();
                    let (code, unknown) = encoder.encode(label);
                    if unknown {
                        debug!(
                            column = %column,
                            value = %label,
                            fallback = %encoder.fallback_class(),
                            "Unknown category replaced by fallback class"
                        );
                        report.record_unknown(column);
                    }
                    code as f64
                } else {
                    row.numeric(column).unwrap_or(f64::NAN)
                };

                if !value.is_finite() {
                    return Err(PodcastError::InvalidInput(format!(
                        "feature {} is not a finite number",
                        column
                    )));
                }
                flat.push(value);
            }
        }

        let values = Array2::from_shape_vec((rows.len(), n_cols), flat)?;
        Ok((
            FeatureMatrix {
                columns: schema::feature_names(),
                values,
            },
            report,
        ))
    }
}

/// Fill NaN in the group-fill columns with the mean of the record's Genre
fn fill_genre_means(rows: &mut [EngineeredRecord]) {
    for column in schema::GROUP_FILL_COLUMNS {
        let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
        for row in rows.iter() {
            if let Some(v) = row.numeric(column).filter(|v| !v.is_nan()) {
                let entry = sums.entry(row.genre.clone()).or_insert((0.0, 0));
                entry.0 += v;
                entry.1 += 1;
            }
        }

        for row in rows.iter_mut() {
            let genre = row.genre.clone();
            if let Some(slot) = row.numeric_mut(column) {
                if slot.is_nan() {
                    if let Some((sum, n)) = sums.get(&genre) {
                        *slot = sum / *n as f64;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(genre: &str, length: Option<f64>, sentiment: &str) -> RawRecord {
        RawRecord::new()
            .with("Podcast_Name", "TechTalk")
            .with("Episode_Title", "Episode 7")
            .with("Episode_Length_minutes", length.map(FieldValue::Number).unwrap_or(FieldValue::Null))
            .with("Genre", genre)
            .with("Host_Popularity_percentage", 60.0)
            .with("Publication_Day", "Saturday")
            .with("Publication_Time", "Morning")
            .with("Guest_Popularity_percentage", 30.0)
            .with("Number_of_Ads", 2.0)
            .with("Episode_Sentiment", sentiment)
    }

    #[test]
    fn test_engineer_record_derives_features() {
        let transformer = FeatureTransformer::new(ImputationTable::new());
        let row = transformer
            .engineer_record(&episode("Technology", Some(45.0), "Positive"))
            .unwrap();

        assert_eq!(row.derived.is_weekend, 1.0);
        assert_eq!(row.derived.is_morning, 1.0);
        assert_eq!(row.derived.is_night, 0.0);
        assert_eq!(row.derived.length_bucket, "medium");
        assert_eq!(row.derived.sentiment_score, 1.0);
        assert_eq!(row.derived.episode_number, 7.0);
        assert!((row.derived.ads_per_minute - 2.0 / 45.001).abs() < 1e-12);
        assert_eq!(row.derived.genre_sentiment, "Technology_Positive");
    }

    #[test]
    fn test_missing_field_without_fallback() {
        let transformer = FeatureTransformer::new(ImputationTable::new());
        let mut record = episode("Technology", Some(45.0), "Positive");
        record.remove("Genre");

        let err = transformer.engineer_record(&record).unwrap_err();
        assert!(matches!(err, PodcastError::MissingField(ref f) if f == "Genre"));
    }

    #[test]
    fn test_absent_field_uses_table_entry() {
        let imputation = ImputationTable::new().with_mode("Genre", "Comedy");
        let transformer = FeatureTransformer::new(imputation);
        let mut record = episode("Technology", Some(45.0), "Positive");
        record.remove("Genre");

        let row = transformer.engineer_record(&record).unwrap();
        assert_eq!(row.genre, "Comedy");
        assert_eq!(row.derived.genre_sentiment, "Comedy_Positive");
    }

    #[test]
    fn test_genre_fill_runs_only_in_fit_mode() {
        let transformer = FeatureTransformer::new(ImputationTable::new());
        let records = vec![
            episode("News", Some(20.0), "Neutral"),
            episode("News", Some(40.0), "Neutral"),
            episode("News", None, "Neutral"),
            episode("Comedy", Some(90.0), "Neutral"),
        ];

        let fitted = transformer.engineer(&records, TransformMode::Fit).unwrap();
        assert_eq!(fitted[2].episode_length, 30.0);

        let served = transformer.engineer(&records, TransformMode::Serve).unwrap();
        assert!(served[2].episode_length.is_nan());
    }

    #[test]
    fn test_fit_transform_and_serve_agree() {
        let mut transformer = FeatureTransformer::new(ImputationTable::new());
        let records = vec![
            episode("News", Some(20.0), "Negative"),
            episode("Comedy", Some(75.0), "Positive"),
        ];

        let fitted = transformer.fit_transform(&records).unwrap();
        let (served, report) = transformer.transform(&records).unwrap();

        assert_eq!(fitted, served);
        assert_eq!(report.total_unknown(), 0);
        assert_eq!(fitted.columns.len(), FEATURE_COLUMNS.len());
    }

    #[test]
    fn test_unknown_category_encodes_as_first_class() {
        let mut transformer = FeatureTransformer::new(ImputationTable::new());
        transformer
            .fit_transform(&[
                episode("News", Some(20.0), "Negative"),
                episode("Comedy", Some(75.0), "Positive"),
            ])
            .unwrap();

        let (matrix, report) = transformer
            .transform_one(&episode("Jazz", Some(50.0), "Positive"))
            .unwrap();

        assert_eq!(matrix.column("Genre").unwrap()[0], 0.0);
        assert_eq!(report.unknown_categories.get("Genre"), Some(&1));
        assert_eq!(report.unknown_categories.get("genre_sentiment"), Some(&1));
    }

    #[test]
    fn test_non_finite_feature_is_rejected() {
        let mut transformer = FeatureTransformer::new(ImputationTable::new());
        transformer
            .fit_transform(&[episode("News", Some(20.0), "Neutral")])
            .unwrap();

        let err = transformer
            .transform_one(&episode("News", None, "Neutral"))
            .unwrap_err();
        assert!(err.to_string().contains("Episode_Length_minutes"));
    }
}
