//! Backend seam for the session engine

use async_trait::async_trait;
use docrag_client::{RagApiClient, Result};
use docrag_core::domain::task::{PollResponse, TaskHandle};
use docrag_core::dto::ask::AskRequest;

/// The two backend operations a question session needs
///
/// Implemented by [`RagApiClient`] for production use; tests drive the
/// session with scripted in-memory implementations.
#[async_trait]
pub trait QaBackend: Send + Sync {
    /// Starts an answering task for the given question
    async fn ask_question(&self, req: AskRequest) -> Result<TaskHandle>;

    /// Polls an answering task by its opaque id
    async fn get_task_status(&self, task_id: &str) -> Result<PollResponse>;
}

#[async_trait]
impl QaBackend for RagApiClient {
    async fn ask_question(&self, req: AskRequest) -> Result<TaskHandle> {
        RagApiClient::ask_question(self, req).await
    }

    async fn get_task_status(&self, task_id: &str) -> Result<PollResponse> {
        RagApiClient::get_task_status(self, task_id).await
    }
}
