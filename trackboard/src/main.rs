use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

use crate::api::AppState;
use crate::config::Config;
use tracker::Tracker;

mod api;
mod config;

#[derive(Parser, Debug)]
#[command(about = "Reporting and update gateway for a remote engagement tracker")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, default_value = "trackboard.yaml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match Config::from_file(&cli.config) {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(path = %cli.config.display(), %error, "failed to load config");
            std::process::exit(1);
        }
    };

    if let Err(error) = run(config).await {
        tracing::error!(%error, "server exited with error");
        std::process::exit(1);
    }
}

async fn run(config: Config) -> std::io::Result<()> {
    let tracker = Tracker::new(
        &config.tracker.base_url,
        &config.tracker.token,
        Duration::from_secs(config.tracker.timeout_secs),
        config.tracker.fetch_limit,
    );
    let state = AppState {
        tracker,
        jira_counts_max_ids: config.tracker.jira_counts_max_ids,
    };

    let addr = format!("{}:{}", config.listener.host, config.listener.port);
    tracing::info!(listen = %addr, upstream = %config.tracker.base_url, "starting trackboard");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, api::router(state)).await
}
