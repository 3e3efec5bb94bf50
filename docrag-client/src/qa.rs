//! Question-answering API endpoints

use crate::RagApiClient;
use crate::error::Result;
use docrag_core::domain::task::{PollResponse, TaskHandle};
use docrag_core::dto::ask::AskRequest;
use tracing::debug;

impl RagApiClient {
    // =============================================================================
    // Question Answering
    // =============================================================================

    /// Submit a question to the RAG system
    ///
    /// Starts an answering task on the backend. The returned handle carries
    /// the task id to poll with; the answer itself is fetched via
    /// [`get_task_status`](Self::get_task_status).
    ///
    /// # Arguments
    /// * `req` - The ask request (question text and chunk count)
    ///
    /// # Returns
    /// The handle of the started task
    ///
    /// # Example
    /// ```no_run
    /// # use docrag_client::RagApiClient;
    /// # use docrag_core::dto::ask::AskRequest;
    /// # async fn example() -> docrag_client::Result<()> {
    /// let client = RagApiClient::new("http://localhost:8000");
    /// let handle = client.ask_question(AskRequest::new("What is RAG?")).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn ask_question(&self, req: AskRequest) -> Result<TaskHandle> {
        let url = format!("{}/api/ask", self.base_url);
        debug!("Submitting question to {}", url);

        let response = self.client.post(&url).json(&req).send().await?;

        self.handle_response(response).await
    }

    /// Get the status of an answering task
    ///
    /// # Arguments
    /// * `task_id` - The task id returned by [`ask_question`](Self::ask_question)
    ///
    /// # Returns
    /// The finished answer once the task is terminal, otherwise the current
    /// task handle
    pub async fn get_task_status(&self, task_id: &str) -> Result<PollResponse> {
        let url = format!("{}/api/task_status/{}", self.base_url, task_id);
        let response = self.client.get(&url).send().await?;

        self.handle_response(response).await
    }
}
