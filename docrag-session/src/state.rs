//! Session state snapshots

use docrag_core::domain::task::RagAnswer;

/// Terminal outcome of a question/answer session
///
/// A closed sum: an answer and an error can never coexist.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// The backend produced an answer
    Answer(RagAnswer),
    /// The session failed with a user-visible message
    Error(String),
}

/// Immutable view of a session at one point in time
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    /// Last submitted question, trimmed
    pub question: String,
    /// Id of the outstanding answering task, if any
    pub task_id: Option<String>,
    /// True from submission until a terminal outcome or error
    pub is_busy: bool,
    /// Terminal outcome, if one has been reached
    pub outcome: Option<Outcome>,
}

impl SessionSnapshot {
    pub(crate) fn empty() -> Self {
        Self {
            question: String::new(),
            task_id: None,
            is_busy: false,
            outcome: None,
        }
    }

    /// Current phase of the session state machine
    pub fn phase(&self) -> SessionPhase {
        match (&self.outcome, self.is_busy, &self.task_id) {
            (Some(Outcome::Answer(_)), _, _) => SessionPhase::Answered,
            (Some(Outcome::Error(_)), _, _) => SessionPhase::Failed,
            (None, true, Some(_)) => SessionPhase::Polling,
            (None, true, None) => SessionPhase::Submitting,
            (None, false, _) => SessionPhase::Idle,
        }
    }
}

/// Phase of the session state machine, derived from a snapshot
///
/// `Answered` and `Failed` are terminal until a new submission resets the
/// session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No submission yet, or cancelled before any outcome
    Idle,
    /// Submission request in flight, no task id yet
    Submitting,
    /// Task outstanding, poll cycle scheduled
    Polling,
    /// Terminal answer received
    Answered,
    /// Terminal error from submission or polling
    Failed,
}
