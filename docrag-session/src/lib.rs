//! Docrag Session Engine
//!
//! Drives one question/answer interaction against the docrag backend:
//! submitting a question starts a background answering task, a poll cycle
//! queries the task status on a fixed interval until it is terminal, and
//! the outcome (answer or error) lands in the session state.
//!
//! The engine talks to the backend through the [`QaBackend`] seam, so it
//! can be driven by the real HTTP client or by a scripted test double.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use docrag_client::RagApiClient;
//! use docrag_session::{QuestionSession, SessionConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = RagApiClient::new("http://localhost:8000");
//!     let session = QuestionSession::new(Arc::new(client), SessionConfig::default());
//!
//!     session.submit("What is RAG?").await;
//!     let snapshot = session.settled().await;
//!
//!     println!("{:?}", snapshot.outcome);
//! }
//! ```

mod backend;
mod config;
mod session;
mod state;

pub use backend::QaBackend;
pub use config::SessionConfig;
pub use session::QuestionSession;
pub use state::{Outcome, SessionPhase, SessionSnapshot};
