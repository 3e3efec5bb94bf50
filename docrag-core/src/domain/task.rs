//! Question-answering task types
//!
//! A submitted question becomes a background task on the backend. The
//! client holds an opaque task id and polls until the task produces an
//! answer.

use serde::{Deserialize, Serialize};

/// Lifecycle states the backend reports for an answering task
///
/// The backend emits lowercase strings for in-progress states and
/// uppercase strings for terminal ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskState {
    #[serde(rename = "pending")]
    Pending,
    #[serde(rename = "processing")]
    Processing,
    #[serde(rename = "SUCCESS")]
    Success,
    #[serde(rename = "FAILURE")]
    Failure,
}

impl TaskState {
    /// True when no further polling is needed
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskState::Success | TaskState::Failure)
    }
}

/// Handle for an outstanding answering task
///
/// Returned when a question is submitted and on every non-terminal poll.
/// The `task_id` is opaque to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskHandle {
    pub task_id: String,
    pub status: TaskState,
    pub message: String,
}

/// Terminal result of an answering task
///
/// Carries no task fields; a poll response is recognized as terminal by
/// this shape alone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RagAnswer {
    pub question: String,
    pub answer: String,
    pub retrieved_chunks: Vec<String>,
}

/// Response of a status poll
///
/// Either the finished answer or a handle for a task that is still
/// running. Untagged: the two shapes share no required fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PollResponse {
    Completed(RagAnswer),
    InProgress(TaskHandle),
}
