use bing_wallpaper::{Config, Pipeline};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // .env is optional; real deployments usually inject the environment directly
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_target(false)
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(?path, "loaded .env");
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    let pipeline = match Pipeline::new(config) {
        Ok(pipeline) => pipeline,
        Err(e) => {
            tracing::error!(error = %e, "failed to initialize pipeline");
            return ExitCode::FAILURE;
        }
    };

    match pipeline.run().await {
        Ok(reports) => {
            for report in &reports {
                tracing::info!(
                    region = %report.info.region,
                    date = %report.info.date_string(),
                    archive = ?report.archive,
                    "published"
                );
            }
            ExitCode::SUCCESS
        }
        // Already logged with stage context by the pipeline
        Err(_) => ExitCode::FAILURE,
    }
}
