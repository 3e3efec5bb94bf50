//! Ask command handler
//!
//! Submits a question, waits for the answering task to finish, and
//! renders the answer with its sources.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use colored::*;

use docrag_core::domain::task::RagAnswer;
use docrag_session::{Outcome, QuestionSession, SessionConfig};

use crate::commands::build_client;
use crate::config::Config;

/// Handle the ask command
///
/// # Arguments
/// * `question` - The question text
/// * `chunks` - Retrieved chunk count handed to the generator
/// * `interval_ms` - Poll interval in milliseconds
/// * `config` - The CLI configuration
pub async fn handle_ask_command(
    question: &str,
    chunks: usize,
    interval_ms: u64,
    config: &Config,
) -> Result<()> {
    if question.trim().is_empty() {
        bail!("question must not be empty");
    }

    let session_config = SessionConfig {
        poll_interval: Duration::from_millis(interval_ms),
        num_chunks: chunks,
    };
    session_config.validate()?;

    let client = build_client(config)?;
    let session = QuestionSession::new(Arc::new(client), session_config);

    session.submit(question).await;

    println!("{}", "Processing your question, please wait...".dimmed());

    let snapshot = session.settled().await;

    match snapshot.outcome {
        Some(Outcome::Answer(answer)) => {
            print_answer(&answer);
            Ok(())
        }
        Some(Outcome::Error(message)) => bail!("{}", message),
        None => bail!("session ended without an outcome"),
    }
}

/// Print the answer with its sources
fn print_answer(answer: &RagAnswer) {
    println!("{}", "Answer:".bold());
    println!("  {} {}", "Q:".cyan(), answer.question);
    println!("  {} {}", "A:".cyan(), answer.answer);

    if !answer.retrieved_chunks.is_empty() {
        println!();
        println!("{}", "Sources:".bold());
        for (index, chunk) in answer.retrieved_chunks.iter().enumerate() {
            println!("  {} {}", format!("[{}]", index + 1).dimmed(), chunk);
        }
    }
}
