//! Document command handlers
//!
//! Handles listing uploaded documents and uploading new ones.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Subcommand;
use colored::*;

use docrag_client::RagApiClient;
use docrag_core::domain::document::Document;
use docrag_core::dto::document::UploadDocument;

use crate::commands::build_client;
use crate::config::Config;

/// Document subcommands
#[derive(Subcommand)]
pub enum DocCommands {
    /// List uploaded documents
    List {
        /// Page number, starting at 1
        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Documents per page
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },
    /// Upload a text file for ingestion
    Upload {
        /// Path of the file to upload
        path: PathBuf,
    },
}

/// Handle document commands
///
/// # Arguments
/// * `command` - The document command to execute
/// * `config` - The CLI configuration
pub async fn handle_doc_command(command: DocCommands, config: &Config) -> Result<()> {
    let client = build_client(config)?;

    match command {
        DocCommands::List { page, page_size } => list_documents(&client, page, page_size).await,
        DocCommands::Upload { path } => upload_document(&client, &path).await,
    }
}

/// List one page of documents
async fn list_documents(client: &RagApiClient, page: u32, page_size: u32) -> Result<()> {
    let documents = client.list_documents(page, page_size).await?;

    if documents.items.is_empty() {
        println!("{}", "No documents found.".yellow());
    } else {
        println!(
            "{}",
            format!(
                "Showing {} of {} document(s):",
                documents.items.len(),
                documents.count
            )
            .bold()
        );
        println!();
        for document in &documents.items {
            print_document(document);
        }
    }

    Ok(())
}

/// Upload a file as a new document
async fn upload_document(client: &RagApiClient, path: &Path) -> Result<()> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("Invalid file name: {}", path.display()))?
        .to_string();

    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let document = client
        .upload_document(UploadDocument { filename, content })
        .await?;

    println!("{} Uploaded {}", "✓".green(), document.filename.bold());
    println!("  ID: {}", document.id.to_string().dimmed());

    Ok(())
}

/// Print a document summary
fn print_document(document: &Document) {
    println!("  {} {}", "▸".cyan(), document.filename.bold());
    println!("    ID:       {}", document.id.to_string().dimmed());
    println!(
        "    Uploaded: {}",
        document
            .uploaded_at
            .format("%Y-%m-%d %H:%M:%S")
            .to_string()
            .dimmed()
    );
    println!();
}
