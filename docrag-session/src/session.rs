//! Question/answer session engine
//!
//! One session covers one question/answer interaction: submitting a
//! question starts a backend answering task, a spawned poll cycle queries
//! the task on a fixed interval until it is terminal, and the outcome
//! lands in the session state.
//!
//! Lifecycle rules:
//! - A new submission supersedes everything: outcome, task id, and any
//!   scheduled poll cycle are cleared before the request goes out.
//! - At most one poll cycle is scheduled at any time.
//! - The poll cycle deactivates itself on every exit path: terminal
//!   answer, failed poll, supersession, cancel, and session drop.

use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, warn};

use docrag_client::ClientError;
use docrag_core::domain::task::PollResponse;
use docrag_core::dto::ask::AskRequest;

use crate::backend::QaBackend;
use crate::config::SessionConfig;
use crate::state::{Outcome, SessionSnapshot};

/// Message shown when a status poll fails
const POLL_FAILED: &str = "Failed to get the status of the task.";

/// Message shown when submission fails without a backend message
const SUBMIT_FAILED: &str = "An unexpected error occurred.";

/// Mutable session state shared with the poll cycle
struct SessionState {
    /// Supersession counter; bumped by every submit and cancel.
    /// A poll cycle applies effects only while the epoch it captured at
    /// activation is still current.
    epoch: u64,
    question: String,
    task_id: Option<String>,
    is_busy: bool,
    outcome: Option<Outcome>,
    /// Handle of the scheduled poll cycle, if one is active
    poll_task: Option<JoinHandle<()>>,
}

impl SessionState {
    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            question: self.question.clone(),
            task_id: self.task_id.clone(),
            is_busy: self.is_busy,
            outcome: self.outcome.clone(),
        }
    }
}

/// One question/answer interaction against the backend
///
/// Submitting a question invalidates everything from the previous one;
/// results of a superseded submission never surface. State changes are
/// observable through [`snapshot`](Self::snapshot) or the watch channel
/// returned by [`subscribe`](Self::subscribe).
pub struct QuestionSession {
    backend: Arc<dyn QaBackend>,
    config: SessionConfig,
    state: Arc<Mutex<SessionState>>,
    tx: Arc<watch::Sender<SessionSnapshot>>,
}

impl QuestionSession {
    /// Creates an idle session over the given backend
    pub fn new(backend: Arc<dyn QaBackend>, config: SessionConfig) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::empty());

        Self {
            backend,
            config,
            state: Arc::new(Mutex::new(SessionState {
                epoch: 0,
                question: String::new(),
                task_id: None,
                is_busy: false,
                outcome: None,
                poll_task: None,
            })),
            tx: Arc::new(tx),
        }
    }

    /// Current state of the session
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.lock().unwrap().snapshot()
    }

    /// Subscribe to state changes
    ///
    /// Every mutation publishes a fresh snapshot to the channel.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    /// Waits until the session is no longer busy and returns the final snapshot
    ///
    /// Returns immediately if nothing is in flight.
    pub async fn settled(&self) -> SessionSnapshot {
        let mut rx = self.subscribe();

        loop {
            let snapshot = rx.borrow_and_update().clone();
            if !snapshot.is_busy {
                return snapshot;
            }
            if rx.changed().await.is_err() {
                return snapshot;
            }
        }
    }

    /// Submits a question
    ///
    /// An empty or whitespace-only question is ignored entirely: no
    /// request is issued and no state changes. Otherwise the previous
    /// outcome, task id, and poll cycle are dropped before the start-job
    /// request goes out.
    pub async fn submit(&self, question: &str) {
        let question = question.trim();
        if question.is_empty() {
            debug!("Ignoring empty question");
            return;
        }

        let epoch = self.reset_for_submission(question);

        debug!("Submitting question: \"{}\"", question);

        let request = AskRequest::new(question).with_num_chunks(self.config.num_chunks);

        match self.backend.ask_question(request).await {
            Ok(handle) => {
                let mut state = self.state.lock().unwrap();
                if state.epoch != epoch {
                    debug!("Submission superseded, dropping task {}", handle.task_id);
                    return;
                }
                state.task_id = Some(handle.task_id.clone());
                publish(&self.tx, &state);
                drop(state);

                self.activate_polling(handle.task_id, epoch);
            }
            Err(e) => {
                warn!("Failed to submit question: {}", e);
                let mut state = self.state.lock().unwrap();
                if state.epoch != epoch {
                    return;
                }
                state.is_busy = false;
                state.outcome = Some(Outcome::Error(submission_error(&e)));
                publish(&self.tx, &state);
            }
        }
    }

    /// Cancels the session
    ///
    /// Aborts any scheduled poll cycle and clears the outstanding task.
    /// Safe to call at any time; cancelling an idle or terminal session
    /// has no observable effect.
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap();
        if !state.is_busy && state.task_id.is_none() && state.poll_task.is_none() {
            return;
        }

        debug!("Cancelling session");
        state.epoch += 1;
        if let Some(task) = state.poll_task.take() {
            task.abort();
        }
        state.task_id = None;
        state.is_busy = false;
        publish(&self.tx, &state);
    }

    /// Clears all prior state and claims a new epoch
    fn reset_for_submission(&self, question: &str) -> u64 {
        let mut state = self.state.lock().unwrap();

        state.epoch += 1;
        if let Some(task) = state.poll_task.take() {
            task.abort();
        }
        state.task_id = None;
        state.outcome = None;
        state.is_busy = true;
        state.question = question.to_string();
        publish(&self.tx, &state);

        state.epoch
    }

    /// Schedules the poll cycle for an outstanding task
    ///
    /// The first query fires one full interval after activation, never
    /// immediately. The cycle applies effects only while the captured
    /// epoch is current, so a tick that raced past the synchronous abort
    /// cannot touch a newer submission's state.
    fn activate_polling(&self, task_id: String, epoch: u64) {
        let backend = Arc::clone(&self.backend);
        let shared = Arc::clone(&self.state);
        let tx = Arc::clone(&self.tx);
        let interval = self.config.poll_interval;

        debug!("Starting to poll for task {}", task_id);

        let handle = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + interval, interval);

            loop {
                ticker.tick().await;

                if shared.lock().unwrap().epoch != epoch {
                    return;
                }

                match backend.get_task_status(&task_id).await {
                    Ok(PollResponse::Completed(answer)) => {
                        debug!("Task {} complete", task_id);
                        let mut state = shared.lock().unwrap();
                        if state.epoch != epoch {
                            return;
                        }
                        state.task_id = None;
                        state.is_busy = false;
                        state.outcome = Some(Outcome::Answer(answer));
                        state.poll_task = None;
                        publish(&tx, &state);
                        return;
                    }
                    Ok(PollResponse::InProgress(handle)) if !handle.status.is_terminal() => {
                        debug!("Task {} still in progress ({:?})", task_id, handle.status);
                    }
                    Ok(PollResponse::InProgress(handle)) => {
                        // Terminal status without an answer payload; the
                        // contract reserves this for failed tasks.
                        warn!(
                            "Task {} reported terminal status {:?} without an answer",
                            task_id, handle.status
                        );
                        let mut state = shared.lock().unwrap();
                        if state.epoch != epoch {
                            return;
                        }
                        fail_poll(&mut state, &tx);
                        return;
                    }
                    Err(e) => {
                        warn!("Error polling task {}: {}", task_id, e);
                        let mut state = shared.lock().unwrap();
                        if state.epoch != epoch {
                            return;
                        }
                        fail_poll(&mut state, &tx);
                        return;
                    }
                }
            }
        });

        let mut state = self.state.lock().unwrap();
        if state.epoch == epoch {
            state.poll_task = Some(handle);
        } else {
            // A newer submission won the race while the cycle was spawning
            handle.abort();
        }
    }
}

impl Drop for QuestionSession {
    fn drop(&mut self) {
        if let Ok(mut state) = self.state.lock() {
            state.epoch += 1;
            if let Some(task) = state.poll_task.take() {
                task.abort();
            }
        }
    }
}

/// Publishes a snapshot of the given state
fn publish(tx: &watch::Sender<SessionSnapshot>, state: &SessionState) {
    tx.send_replace(state.snapshot());
}

/// Applies the fatal-poll outcome and deactivates the cycle
fn fail_poll(state: &mut SessionState, tx: &watch::Sender<SessionSnapshot>) {
    state.task_id = None;
    state.is_busy = false;
    state.outcome = Some(Outcome::Error(POLL_FAILED.to_string()));
    state.poll_task = None;
    publish(tx, state);
}

/// Maps a submission failure to its user-visible message
fn submission_error(err: &ClientError) -> String {
    match err.backend_message() {
        Some(message) => format!("Error submitting question: {}", message),
        None => SUBMIT_FAILED.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::SessionPhase;

    use std::collections::{HashMap, VecDeque};
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use docrag_core::domain::task::{RagAnswer, TaskHandle, TaskState};

    /// Backend stub fed with canned responses
    struct ScriptedBackend {
        asks: Mutex<VecDeque<docrag_client::Result<TaskHandle>>>,
        polls: Mutex<HashMap<String, VecDeque<docrag_client::Result<PollResponse>>>>,
        asked: Mutex<Vec<String>>,
        polled: Mutex<Vec<String>>,
    }

    impl ScriptedBackend {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                asks: Mutex::new(VecDeque::new()),
                polls: Mutex::new(HashMap::new()),
                asked: Mutex::new(Vec::new()),
                polled: Mutex::new(Vec::new()),
            })
        }

        fn push_ask(&self, response: docrag_client::Result<TaskHandle>) {
            self.asks.lock().unwrap().push_back(response);
        }

        fn push_poll(&self, task_id: &str, response: docrag_client::Result<PollResponse>) {
            self.polls
                .lock()
                .unwrap()
                .entry(task_id.to_string())
                .or_default()
                .push_back(response);
        }

        fn asked(&self) -> Vec<String> {
            self.asked.lock().unwrap().clone()
        }

        fn polled(&self) -> Vec<String> {
            self.polled.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl QaBackend for ScriptedBackend {
        async fn ask_question(&self, req: AskRequest) -> docrag_client::Result<TaskHandle> {
            self.asked.lock().unwrap().push(req.question);
            self.asks
                .lock()
                .unwrap()
                .pop_front()
                .expect("no scripted ask response left")
        }

        async fn get_task_status(&self, task_id: &str) -> docrag_client::Result<PollResponse> {
            self.polled.lock().unwrap().push(task_id.to_string());
            self.polls
                .lock()
                .unwrap()
                .get_mut(task_id)
                .and_then(|queue| queue.pop_front())
                .expect("no scripted poll response left")
        }
    }

    /// Backend whose polls for one task block until the test opens the gate
    struct GatedBackend {
        inner: Arc<ScriptedBackend>,
        gated_task: String,
        gate: Notify,
        reached: Notify,
    }

    #[async_trait]
    impl QaBackend for GatedBackend {
        async fn ask_question(&self, req: AskRequest) -> docrag_client::Result<TaskHandle> {
            self.inner.ask_question(req).await
        }

        async fn get_task_status(&self, task_id: &str) -> docrag_client::Result<PollResponse> {
            if task_id == self.gated_task {
                self.reached.notify_one();
                self.gate.notified().await;
            }
            self.inner.get_task_status(task_id).await
        }
    }

    fn handle(task_id: &str, status: TaskState) -> TaskHandle {
        TaskHandle {
            task_id: task_id.to_string(),
            status,
            message: "Your question is being processed.".to_string(),
        }
    }

    fn rag_answer(question: &str) -> RagAnswer {
        RagAnswer {
            question: question.to_string(),
            answer: "Retrieval-Augmented Generation.".to_string(),
            retrieved_chunks: vec!["Source chunk 1".to_string()],
        }
    }

    fn new_session(backend: Arc<ScriptedBackend>) -> QuestionSession {
        QuestionSession::new(backend, SessionConfig::default())
    }

    async fn settle(session: &QuestionSession) -> SessionSnapshot {
        time::timeout(Duration::from_secs(120), session.settled())
            .await
            .expect("session did not settle")
    }

    #[tokio::test]
    async fn test_empty_question_is_noop() {
        let backend = ScriptedBackend::new();
        let session = new_session(backend.clone());

        session.submit("").await;
        session.submit("   \n\t").await;

        assert!(backend.asked().is_empty());
        assert_eq!(session.snapshot(), SessionSnapshot::empty());
        assert_eq!(session.snapshot().phase(), SessionPhase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_is_busy_before_first_poll() {
        let backend = ScriptedBackend::new();
        backend.push_ask(Ok(handle("task-123", TaskState::Pending)));
        backend.push_poll(
            "task-123",
            Ok(PollResponse::Completed(rag_answer("What is RAG?"))),
        );
        let session = new_session(backend.clone());

        session.submit("  What is RAG?  ").await;

        let snapshot = session.snapshot();
        assert!(snapshot.is_busy);
        assert_eq!(snapshot.task_id.as_deref(), Some("task-123"));
        assert_eq!(snapshot.outcome, None);
        assert_eq!(snapshot.phase(), SessionPhase::Polling);
        assert_eq!(backend.asked(), vec!["What is RAG?"]);
        assert!(backend.polled().is_empty());

        // First query fires only after one full interval
        time::sleep(Duration::from_millis(2900)).await;
        assert!(backend.polled().is_empty());
        time::sleep(Duration::from_millis(200)).await;
        assert_eq!(backend.polled(), vec!["task-123"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_cycle_until_answer() {
        let backend = ScriptedBackend::new();
        backend.push_ask(Ok(handle("task-123", TaskState::Pending)));
        backend.push_poll(
            "task-123",
            Ok(PollResponse::InProgress(handle(
                "task-123",
                TaskState::Processing,
            ))),
        );
        backend.push_poll(
            "task-123",
            Ok(PollResponse::Completed(rag_answer("What is RAG?"))),
        );
        let session = new_session(backend.clone());

        session.submit("What is RAG?").await;
        let snapshot = settle(&session).await;

        assert!(!snapshot.is_busy);
        assert_eq!(snapshot.task_id, None);
        assert_eq!(snapshot.phase(), SessionPhase::Answered);
        assert_eq!(
            snapshot.outcome,
            Some(Outcome::Answer(rag_answer("What is RAG?")))
        );
        assert_eq!(backend.asked().len(), 1);
        assert_eq!(backend.polled(), vec!["task-123", "task-123"]);

        // Cycle deactivated: no further ticks fire
        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.polled().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submission_failure_surfaces_backend_message() {
        let backend = ScriptedBackend::new();
        backend.push_ask(Err(ClientError::api_error(503, "Backend is down")));
        let session = new_session(backend.clone());

        session.submit("Will this fail?").await;

        let snapshot = session.snapshot();
        assert_eq!(
            snapshot.outcome,
            Some(Outcome::Error(
                "Error submitting question: Backend is down".to_string()
            ))
        );
        assert!(!snapshot.is_busy);
        assert_eq!(snapshot.task_id, None);
        assert_eq!(snapshot.phase(), SessionPhase::Failed);

        // No poll cycle is ever scheduled for a failed submission
        time::sleep(Duration::from_secs(30)).await;
        assert!(backend.polled().is_empty());
    }

    #[tokio::test]
    async fn test_submission_failure_without_backend_message() {
        let backend = ScriptedBackend::new();
        backend.push_ask(Err(ClientError::ParseError("bad json".to_string())));
        let session = new_session(backend.clone());

        session.submit("Will this fail?").await;

        assert_eq!(
            session.snapshot().outcome,
            Some(Outcome::Error("An unexpected error occurred.".to_string()))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_failure_is_fatal() {
        let backend = ScriptedBackend::new();
        backend.push_ask(Ok(handle("task-456", TaskState::Pending)));
        backend.push_poll("task-456", Err(ClientError::api_error(500, "boom")));
        let session = new_session(backend.clone());

        session.submit("Will polling fail?").await;
        let snapshot = settle(&session).await;

        assert_eq!(
            snapshot.outcome,
            Some(Outcome::Error(
                "Failed to get the status of the task.".to_string()
            ))
        );
        assert_eq!(snapshot.task_id, None);
        assert_eq!(snapshot.phase(), SessionPhase::Failed);

        // A single failed poll is fatal: no retry
        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.polled().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_failure_status_is_fatal() {
        let backend = ScriptedBackend::new();
        backend.push_ask(Ok(handle("task-9", TaskState::Pending)));
        backend.push_poll(
            "task-9",
            Ok(PollResponse::InProgress(handle("task-9", TaskState::Failure))),
        );
        let session = new_session(backend.clone());

        session.submit("Will the task fail?").await;
        let snapshot = settle(&session).await;

        assert_eq!(
            snapshot.outcome,
            Some(Outcome::Error(
                "Failed to get the status of the task.".to_string()
            ))
        );
        time::sleep(Duration::from_secs(30)).await;
        assert_eq!(backend.polled().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmission_keeps_single_poll_cycle() {
        let backend = ScriptedBackend::new();
        for i in 1..=5 {
            backend.push_ask(Ok(handle(&format!("task-{}", i), TaskState::Pending)));
        }
        backend.push_poll("task-5", Ok(PollResponse::Completed(rag_answer("Q5"))));
        let session = new_session(backend.clone());

        for i in 1..=5 {
            session.submit(&format!("Q{}", i)).await;
        }

        let snapshot = settle(&session).await;
        assert_eq!(snapshot.outcome, Some(Outcome::Answer(rag_answer("Q5"))));
        // Only the last submission's task was ever polled
        assert_eq!(backend.polled(), vec!["task-5"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_poll_result_never_surfaces() {
        let inner = ScriptedBackend::new();
        inner.push_ask(Ok(handle("task-a", TaskState::Pending)));
        inner.push_ask(Ok(handle("task-b", TaskState::Pending)));
        // task-a would have resolved to a terminal answer for Q1
        inner.push_poll("task-a", Ok(PollResponse::Completed(rag_answer("Q1"))));
        inner.push_poll("task-b", Ok(PollResponse::Completed(rag_answer("Q2"))));

        let backend = Arc::new(GatedBackend {
            inner: inner.clone(),
            gated_task: "task-a".to_string(),
            gate: Notify::new(),
            reached: Notify::new(),
        });
        let session = QuestionSession::new(backend.clone(), SessionConfig::default());

        session.submit("Q1").await;

        // Let task-a's first poll fire and block at the gate
        time::sleep(Duration::from_millis(3100)).await;
        time::timeout(Duration::from_secs(60), backend.reached.notified())
            .await
            .expect("poll for task-a never reached the gate");

        // Supersede while that poll is in flight, then release it
        session.submit("Q2").await;
        backend.gate.notify_waiters();

        let snapshot = settle(&session).await;
        match snapshot.outcome {
            Some(Outcome::Answer(answer)) => assert_eq!(answer.question, "Q2"),
            other => panic!("expected answer for Q2, got {:?}", other),
        }
        assert_eq!(inner.polled(), vec!["task-b"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_submission_clears_prior_outcome() {
        let backend = ScriptedBackend::new();
        backend.push_ask(Ok(handle("task-1", TaskState::Pending)));
        backend.push_poll("task-1", Ok(PollResponse::Completed(rag_answer("Q1"))));
        backend.push_ask(Ok(handle("task-2", TaskState::Pending)));
        let session = new_session(backend.clone());

        session.submit("Q1").await;
        settle(&session).await;

        session.submit("Q2").await;

        let snapshot = session.snapshot();
        assert_eq!(snapshot.outcome, None);
        assert!(snapshot.is_busy);
        assert_eq!(snapshot.question, "Q2");
        assert_eq!(snapshot.phase(), SessionPhase::Polling);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling() {
        let backend = ScriptedBackend::new();
        backend.push_ask(Ok(handle("task-123", TaskState::Pending)));
        let session = new_session(backend.clone());

        session.submit("What is RAG?").await;
        session.cancel();

        let snapshot = session.snapshot();
        assert!(!snapshot.is_busy);
        assert_eq!(snapshot.task_id, None);
        assert_eq!(snapshot.phase(), SessionPhase::Idle);

        time::sleep(Duration::from_secs(30)).await;
        assert!(backend.polled().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_is_idempotent() {
        let backend = ScriptedBackend::new();
        let session = new_session(backend.clone());

        // Cancelling a fresh session changes nothing
        session.cancel();
        assert_eq!(session.snapshot(), SessionSnapshot::empty());

        backend.push_ask(Ok(handle("task-123", TaskState::Pending)));
        backend.push_poll(
            "task-123",
            Ok(PollResponse::Completed(rag_answer("What is RAG?"))),
        );
        session.submit("What is RAG?").await;
        let settled = settle(&session).await;

        // Cancelling a terminal session leaves the outcome in place
        session.cancel();
        session.cancel();
        assert_eq!(session.snapshot(), settled);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_poll_cycle() {
        let backend = ScriptedBackend::new();
        backend.push_ask(Ok(handle("task-123", TaskState::Pending)));
        let session = new_session(backend.clone());

        session.submit("What is RAG?").await;
        drop(session);

        time::sleep(Duration::from_secs(30)).await;
        assert!(backend.polled().is_empty());
    }
}
