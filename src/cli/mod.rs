//! Command-line interface
//!
//! Training, serving, offline prediction and the dropdown side-file.

use clap::{Parser, Subcommand};
use colored::*;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::export::ArtifactPaths;
use crate::inference::Predictor;
use crate::schema::TARGET_COLUMN;
use crate::server::{run_server, ServerConfig};
use crate::training::{TrainingConfig, TrainingPipeline};
use crate::utils::{DataLoader, DropdownCategories};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn accent(s: &str) -> ColoredString { s.truecolor(120, 170, 255) }
fn muted(s: &str) -> ColoredString  { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString     { s.truecolor(100, 210, 120) }

fn step_run(msg: &str) {
    print!("  {} {}... ", accent("›"), msg);
}

fn step_done(detail: &str) {
    println!("{} {}", ok("done"), dim(detail));
}

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) {
    println!("  {:<16} {}", muted(key), val.white());
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "podcast-listening")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Podcast listening-time prediction: training pipeline and inference service")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Train the model and write artifacts
    Train {
        /// Raw training table (CSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Target column name
        #[arg(short, long, default_value = TARGET_COLUMN)]
        target: String,

        /// Number of cross-validation folds
        #[arg(long, default_value = "5")]
        cv_folds: usize,

        /// Seed for the fold shuffle
        #[arg(long, default_value = "42")]
        seed: u64,

        /// L2 regularization strength (0 = ordinary least squares)
        #[arg(long, default_value = "0")]
        alpha: f64,

        /// Artifacts directory
        #[arg(long, default_value = "model")]
        artifacts: PathBuf,

        /// Cross-validation metrics file
        #[arg(long, default_value = "metrics/model_metrics_lr.json")]
        metrics: PathBuf,

        /// CSV rows scanned for schema inference (all rows when omitted)
        #[arg(long)]
        infer_schema_rows: Option<usize>,
    },

    /// Start the inference server
    Serve {
        /// Server port (defaults to API_PORT or 5000)
        #[arg(short, long)]
        port: Option<u16>,

        /// Server host (defaults to API_HOST or 0.0.0.0)
        #[arg(long)]
        host: Option<String>,

        /// Artifacts directory (defaults to ARTIFACTS_DIR or ./model)
        #[arg(long)]
        artifacts: Option<PathBuf>,
    },

    /// Predict one record from a JSON file
    Predict {
        /// JSON object with the raw record fields
        #[arg(short, long)]
        record: PathBuf,

        /// Artifacts directory
        #[arg(long, default_value = "model")]
        artifacts: PathBuf,
    },

    /// Write the dropdown categories side-file for the prediction form
    Categories {
        /// Raw training table (CSV)
        #[arg(short, long)]
        data: PathBuf,

        /// Output file
        #[arg(short, long, default_value = "model/categories.json")]
        output: PathBuf,

        /// CSV rows scanned for schema inference (all rows when omitted)
        #[arg(long)]
        infer_schema_rows: Option<usize>,
    },
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_train(config: TrainingConfig) -> anyhow::Result<()> {
    section("Train");

    step_run(&format!("Training on {}", config.data_path.display()));
    let start = Instant::now();
    let pipeline = TrainingPipeline::new(config);
    let outcome = pipeline.run()?;
    step_done(&format!("{} rows in {:?}", outcome.n_samples, start.elapsed()));

    let report = &outcome.report;
    println!();
    kv("Model", &report.model);
    kv("Folds", &report.n_splits.to_string());
    for fold in &report.folds {
        println!(
            "  {:<16} {}",
            muted(&format!("fold {}", fold.fold)),
            dim(&format!("rmse {:.4}  mae {:.4}  r² {:.4}", fold.rmse, fold.mae, fold.r2))
        );
    }
    kv("RMSE", &format!("{:.4}", report.rmse));
    kv("MAE", &format!("{:.4}", report.mae));
    kv("R²", &format!("{:.4}", report.r2));
    kv("Artifacts", &pipeline.config().artifacts_dir.display().to_string());
    kv("Metrics", &pipeline.config().metrics_path.display().to_string());
    println!();

    Ok(())
}

pub async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    artifacts: Option<PathBuf>,
) -> anyhow::Result<()> {
    let defaults = ServerConfig::default();
    let config = ServerConfig {
        host: host.unwrap_or(defaults.host),
        port: port.unwrap_or(defaults.port),
        artifacts_dir: artifacts.unwrap_or(defaults.artifacts_dir),
    };
    run_server(config).await
}

pub fn cmd_predict(record_path: &Path, artifacts: &Path) -> anyhow::Result<()> {
    section("Predict");

    step_run("Loading artifacts");
    let predictor = Predictor::load(&ArtifactPaths::new(artifacts))?;
    step_done(&artifacts.display().to_string());

    let payload: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(record_path)?)?;
    let prediction = predictor.predict_json(&payload)?;

    println!();
    kv("Listening time", &format!("{:.2} min", prediction.listening_time_minutes));
    for (column, count) in &prediction.report.unknown_categories {
        println!(
            "  {:<16} {}",
            muted("fallback"),
            format!("{} unknown value(s) in {}", count, column).yellow()
        );
    }
    println!();

    Ok(())
}

pub fn cmd_categories(
    data: &Path,
    output: &Path,
    infer_schema_rows: Option<usize>,
) -> anyhow::Result<()> {
    section("Categories");

    step_run("Loading data");
    let df = DataLoader::new()
        .with_infer_schema_length(infer_schema_rows)
        .load_csv(data)?;
    step_done(&format!("{} rows × {} cols", df.height(), df.width()));

    let categories = DropdownCategories::from_frame(&df)?;
    categories.save(output)?;

    kv("Podcasts", &categories.podcasts.len().to_string());
    kv("Titles", &categories.titles.len().to_string());
    kv("Genres", &categories.genres.len().to_string());
    kv("Days", &categories.days.len().to_string());
    kv("Written", &output.display().to_string());
    println!();

    Ok(())
}
