//! Podcast listening-time predictor - main entry point

use clap::Parser;
use podcast_listening::cli::{cmd_categories, cmd_predict, cmd_serve, cmd_train, Cli, Commands};
use podcast_listening::training::TrainingConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "podcast_listening=info,tower_http=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Train { data, target, cv_folds, seed, alpha, artifacts, metrics, infer_schema_rows } => {
            let config = TrainingConfig::new(data)
                .with_target(target)
                .with_n_splits(cv_folds)
                .with_random_state(seed)
                .with_alpha(alpha)
                .with_artifacts_dir(artifacts)
                .with_metrics_path(metrics)
                .with_infer_schema_length(infer_schema_rows);
            cmd_train(config)?;
        }
        Commands::Serve { port, host, artifacts } => {
            cmd_serve(host, port, artifacts).await?;
        }
        Commands::Predict { record, artifacts } => {
            cmd_predict(&record, &artifacts)?;
        }
        Commands::Categories { data, output, infer_schema_rows } => {
            cmd_categories(&data, &output, infer_schema_rows)?;
        }
    }

    Ok(())
}
