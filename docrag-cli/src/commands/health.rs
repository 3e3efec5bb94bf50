//! Health command handler

use anyhow::Result;
use colored::*;

use crate::commands::build_client;
use crate::config::Config;

/// Handle the health command
pub async fn handle_health_command(config: &Config) -> Result<()> {
    let client = build_client(config)?;
    let health = client.healthcheck().await?;

    println!(
        "{} {} ({})",
        "✓".green(),
        health.status.bold(),
        health.message
    );

    Ok(())
}
