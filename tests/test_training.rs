//! Integration test: training pipeline end-to-end

use podcast_listening::export::{load_artifact, ArtifactKind, ArtifactPaths, ModelArtifact};
use podcast_listening::inference::Predictor;
use podcast_listening::preprocessing::{ImputationTable, RawRecord};
use podcast_listening::schema::{self, FEATURE_COLUMNS};
use podcast_listening::training::{
    cross_validate, CrossValidationReport, LinearRegression, TrainingConfig, TrainingPipeline,
};
use podcast_listening::PodcastError;
use polars::prelude::*;
use std::path::Path;

const PODCASTS: [&str; 3] = ["TechTalk", "Laugh Lines", "Daily Brief"];
const GENRES: [&str; 3] = ["Technology", "Comedy", "News"];
const DAYS: [&str; 7] = [
    "Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday",
];
const TIMES: [&str; 4] = ["Morning", "Afternoon", "Evening", "Night"];
const SENTIMENTS: [&str; 3] = ["Negative", "Neutral", "Positive"];

/// 60 synthetic episodes with a few missing lengths and guest scores
fn podcast_df() -> DataFrame {
    let n = 60;
    let mut ids = Vec::with_capacity(n);
    let mut podcasts = Vec::with_capacity(n);
    let mut titles = Vec::with_capacity(n);
    let mut lengths: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut genres = Vec::with_capacity(n);
    let mut hosts = Vec::with_capacity(n);
    let mut days = Vec::with_capacity(n);
    let mut times = Vec::with_capacity(n);
    let mut guests: Vec<Option<f64>> = Vec::with_capacity(n);
    let mut ads = Vec::with_capacity(n);
    let mut sentiments = Vec::with_capacity(n);
    let mut target = Vec::with_capacity(n);

    for i in 0..n {
        let length = 10.0 + ((i * 37) % 110) as f64;
        let host = 20.0 + ((i * 13) % 70) as f64;
        let guest = 5.0 + ((i * 29) % 90) as f64;
        let n_ads = (i % 4) as f64;

        ids.push(i as i64);
        podcasts.push(PODCASTS[i % 3].to_string());
        titles.push(format!("Episode {}", i % 15 + 1));
        lengths.push(if i % 11 == 5 { None } else { Some(length) });
        genres.push(GENRES[(i / 2) % 3].to_string());
        hosts.push(host);
        days.push(DAYS[i % 7].to_string());
        times.push(TIMES[(i / 3) % 4].to_string());
        guests.push(if i % 9 == 4 { None } else { Some(guest) });
        ads.push(n_ads);
        sentiments.push(SENTIMENTS[(i / 5) % 3].to_string());
        target.push(0.75 * length + 0.1 * host - 2.0 * n_ads + ((i * 7) % 5) as f64);
    }

    df!(
        schema::ID_COLUMN => ids,
        schema::PODCAST_NAME => podcasts,
        schema::EPISODE_TITLE => titles,
        schema::EPISODE_LENGTH => lengths,
        schema::GENRE => genres,
        schema::HOST_POPULARITY => hosts,
        schema::PUBLICATION_DAY => days,
        schema::PUBLICATION_TIME => times,
        schema::GUEST_POPULARITY => guests,
        schema::NUMBER_OF_ADS => ads,
        schema::EPISODE_SENTIMENT => sentiments,
        schema::TARGET_COLUMN => target
    )
    .unwrap()
}

fn write_csv(df: &mut DataFrame, path: &Path) {
    let mut file = std::fs::File::create(path).unwrap();
    CsvWriter::new(&mut file).finish(df).unwrap();
}

fn config_in(dir: &Path) -> TrainingConfig {
    TrainingConfig::new(dir.join("train.csv"))
        .with_artifacts_dir(dir.join("model"))
        .with_metrics_path(dir.join("metrics").join("model_metrics_lr.json"))
}

fn tech_talk() -> RawRecord {
    RawRecord::new()
        .with(schema::PODCAST_NAME, "TechTalk")
        .with(schema::EPISODE_TITLE, "Episode 7")
        .with(schema::EPISODE_LENGTH, 45.0)
        .with(schema::GENRE, "Technology")
        .with(schema::HOST_POPULARITY, 60.0)
        .with(schema::PUBLICATION_DAY, "Saturday")
        .with(schema::PUBLICATION_TIME, "Morning")
        .with(schema::GUEST_POPULARITY, 30.0)
        .with(schema::NUMBER_OF_ADS, 2.0)
        .with(schema::EPISODE_SENTIMENT, "Positive")
}

#[test]
fn test_fit_frame_produces_report_and_bundle() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = TrainingPipeline::new(config_in(dir.path()));

    let outcome = pipeline.fit_frame(&podcast_df()).unwrap();

    assert_eq!(outcome.n_samples, 60);
    assert_eq!(outcome.report.n_splits, 5);
    assert_eq!(outcome.report.random_state, 42);
    assert_eq!(outcome.report.folds.len(), 5);
    for (i, fold) in outcome.report.folds.iter().enumerate() {
        assert_eq!(fold.fold, i);
        assert_eq!(fold.n_train + fold.n_validation, 60);
        assert!(fold.rmse.is_finite() && fold.rmse >= 0.0);
    }
    assert!(outcome.report.rmse.is_finite());
    assert!(outcome.report.mae <= outcome.report.rmse + 1e-9);

    // imputation covers every raw column but never the target
    let imputation = &outcome.bundle.imputation;
    assert!(imputation.median(schema::EPISODE_LENGTH).is_some());
    assert!(imputation.mode(schema::GENRE).is_some());
    assert!(imputation.median(schema::TARGET_COLUMN).is_none());
    assert_eq!(outcome.bundle.encoders.len(), 8);
    assert_eq!(outcome.bundle.model.metadata.feature_names.len(), FEATURE_COLUMNS.len());

    // nothing written without persist
    assert!(!dir.path().join("model").exists());
}

#[test]
fn test_cross_validation_is_reproducible() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = TrainingPipeline::new(config_in(dir.path()));

    let first = pipeline.fit_frame(&podcast_df()).unwrap();
    let second = pipeline.fit_frame(&podcast_df()).unwrap();

    assert_eq!(first.report.folds, second.report.folds);
    assert_eq!(first.bundle.model.model, second.bundle.model.model);
}

#[test]
fn test_cross_validate_rejects_too_few_rows() {
    let x = ndarray::Array2::<f64>::zeros((3, 2));
    let y = ndarray::Array1::<f64>::zeros(3);
    assert!(cross_validate(&LinearRegression::new(), &x, &y, 5, 42).is_err());
}

#[test]
fn test_run_writes_artifacts_and_metrics() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_csv(&mut podcast_df(), &config.data_path);

    let outcome = TrainingPipeline::new(config.clone()).run().unwrap();

    let paths = ArtifactPaths::new(&config.artifacts_dir);
    assert!(paths.model().exists());
    assert!(paths.imputation().exists());
    assert!(paths.encoders().exists());

    let report = CrossValidationReport::load(&config.metrics_path).unwrap();
    assert_eq!(report.n_splits, 5);
    assert_eq!(report.folds.len(), 5);
    assert!((report.rmse - outcome.report.rmse).abs() < 1e-12);

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config.metrics_path).unwrap()).unwrap();
    assert_eq!(raw["model"], "Linear Regression");
    assert!(raw["RMSE"].is_number());
    assert!(raw["MAE"].is_number());
    assert!(raw["R2"].is_number());
}

#[test]
fn test_reloaded_artifacts_predict_tech_talk() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_csv(&mut podcast_df(), &config.data_path);
    let outcome = TrainingPipeline::new(config.clone()).run().unwrap();

    let paths = ArtifactPaths::new(&config.artifacts_dir);
    let imputation: ImputationTable = load_artifact(ArtifactKind::Imputation, paths.imputation()).unwrap();
    assert_eq!(imputation, outcome.bundle.imputation);

    let model = ModelArtifact::load(paths.model()).unwrap();
    assert_eq!(model.model, outcome.bundle.model.model);
    assert_eq!(model.metadata.target_name, schema::TARGET_COLUMN);

    let predictor = Predictor::load(&paths).unwrap();
    let prediction = predictor.predict_record(&tech_talk()).unwrap();
    assert!(prediction.listening_time_minutes.is_finite());
    assert!(prediction.listening_time_minutes >= 0.0);
    let scaled = prediction.listening_time_minutes * 100.0;
    assert!((scaled - scaled.round()).abs() < 1e-6);

    let in_memory = Predictor::new(outcome.bundle).predict_record(&tech_talk()).unwrap();
    assert_eq!(in_memory.listening_time_minutes, prediction.listening_time_minutes);
}

#[test]
fn test_corrupted_artifact_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_csv(&mut podcast_df(), &config.data_path);
    TrainingPipeline::new(config.clone()).run().unwrap();

    let paths = ArtifactPaths::new(&config.artifacts_dir);
    let mut bytes = std::fs::read(paths.model()).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0xFF;
    std::fs::write(paths.model(), &bytes).unwrap();

    assert!(matches!(
        Predictor::load(&paths),
        Err(PodcastError::ArtifactLoad { .. })
    ));
}

#[test]
fn test_missing_encoders_file_fails_load() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    write_csv(&mut podcast_df(), &config.data_path);
    TrainingPipeline::new(config.clone()).run().unwrap();

    let paths = ArtifactPaths::new(&config.artifacts_dir);
    std::fs::remove_file(paths.encoders()).unwrap();

    let err = Predictor::load(&paths).unwrap_err();
    assert!(matches!(err, PodcastError::ArtifactLoad { .. }));
}

#[test]
fn test_missing_data_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let result = TrainingPipeline::new(config_in(dir.path())).run();
    assert!(matches!(result, Err(PodcastError::DataError(_))));
    assert!(!dir.path().join("model").exists());
}

#[test]
fn test_missing_target_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let df = podcast_df().drop(schema::TARGET_COLUMN).unwrap();
    let result = TrainingPipeline::new(config_in(dir.path())).fit_frame(&df);
    assert!(matches!(result, Err(PodcastError::DataError(_))));
}

#[test]
fn test_invalid_config_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).with_n_splits(1);
    let result = TrainingPipeline::new(config).fit_frame(&podcast_df());
    assert!(matches!(result, Err(PodcastError::ConfigError(_))));
}

#[test]
fn test_missing_raw_column_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let df = podcast_df().drop(schema::PUBLICATION_TIME).unwrap();
    let err = TrainingPipeline::new(config_in(dir.path())).fit_frame(&df).unwrap_err();
    assert!(matches!(err, PodcastError::DataError(_)));
    assert!(err.to_string().contains(schema::PUBLICATION_TIME));
}

#[test]
fn test_text_typed_numeric_column_is_read_as_numbers() {
    let dir = tempfile::tempdir().unwrap();
    let mut df = podcast_df();
    let ads_as_text = df
        .column(schema::NUMBER_OF_ADS)
        .unwrap()
        .as_materialized_series()
        .cast(&DataType::String)
        .unwrap();
    df.with_column(ads_as_text).unwrap();

    let from_text = TrainingPipeline::new(config_in(dir.path())).fit_frame(&df).unwrap();
    let from_numbers = TrainingPipeline::new(config_in(dir.path())).fit_frame(&podcast_df()).unwrap();

    assert!(from_text.bundle.imputation.median(schema::NUMBER_OF_ADS).is_some());
    assert!(from_text.bundle.imputation.mode(schema::NUMBER_OF_ADS).is_none());
    assert_eq!(from_text.report.folds, from_numbers.report.folds);
}

#[test]
fn test_run_with_bounded_schema_inference() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path()).with_infer_schema_length(Some(20));
    write_csv(&mut podcast_df(), &config.data_path);

    let outcome = TrainingPipeline::new(config).run().unwrap();
    assert_eq!(outcome.n_samples, 60);
}
