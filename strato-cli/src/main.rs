//! Strato CLI
//!
//! Command-line interface for submitting and tracking GPU tasks on the
//! cloud function service.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use strato_agent::config::DEFAULT_BASE_URL;
use strato_core::domain::task::Credentials;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "strato")]
#[command(about = "Strato GPU task CLI", long_about = None)]
struct Cli {
    /// Task API base URL
    #[arg(long, env = "STRATO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// API key for the task service
    #[arg(long, env = "STRATO_API_KEY", hide_env_values = true)]
    api_key: String,

    /// Organization name
    #[arg(long, env = "STRATO_ORG")]
    org: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let config = Config {
        base_url: cli.base_url,
        credentials: Credentials::new(cli.api_key, cli.org),
    };

    handle_command(cli.command, &config).await
}
