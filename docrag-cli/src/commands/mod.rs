//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod ask;
mod docs;
mod health;

pub use docs::DocCommands;

use std::time::Duration;

use anyhow::{Context, Result};
use clap::Subcommand;

use docrag_client::RagApiClient;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Ask a question against the uploaded documents
    Ask {
        /// The question to ask
        question: String,

        /// Number of retrieved chunks handed to the generator
        #[arg(long, default_value_t = 5)]
        chunks: usize,

        /// Poll interval in milliseconds
        #[arg(long, default_value_t = 3000)]
        interval_ms: u64,
    },
    /// Document management
    Docs {
        #[command(subcommand)]
        command: DocCommands,
    },
    /// Check backend health
    Health,
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Ask {
            question,
            chunks,
            interval_ms,
        } => ask::handle_ask_command(&question, chunks, interval_ms, config).await,
        Commands::Docs { command } => docs::handle_doc_command(command, config).await,
        Commands::Health => health::handle_health_command(config).await,
    }
}

/// Builds the backend client with a request timeout
pub(crate) fn build_client(config: &Config) -> Result<RagApiClient> {
    let http_client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .context("Failed to build HTTP client")?;

    Ok(RagApiClient::with_client(&config.api_url, http_client))
}
