//! Conductor - The Interaction Controller
//!
//! The Conductor owns one conversation turn at a time:
//! - accepts a submitted question and appends it to the log
//! - calls the answer service on a spawned task
//! - appends the answer, or the fallback message when anything fails
//! - keeps surfaces informed through [`ConductorMessage`]s
//!
//! # Design Philosophy
//!
//! The Conductor is UI-agnostic. It communicates through:
//! - `ConductorMessage`: Commands sent TO the UI surface
//! - `SurfaceEvent`: Events received FROM the UI surface
//!
//! It is the only writer of the conversation log, the busy flag and the
//! pending input. Surfaces render what they are told.
//!
//! # Request Lifecycle
//!
//! ```text
//! submit ──► append user ──► clear input ──► AwaitingResponse ──► spawn ask
//!                                                                    │
//!            Idle ◄── append answer / fallback ◄── poll_response ◄───┘
//! ```
//!
//! Neither the service call nor the health check blocks the caller. Surfaces
//! call [`Conductor::poll_response`] and [`Conductor::poll_health`] once per
//! frame; headless callers use the `wait_for_*` variants.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinHandle};

use crate::backend::{AnswerError, AnswerService, ServiceConfig};
use crate::events::SurfaceEvent;
use crate::messages::{ConductorMessage, ConductorState};
use crate::metrics::{MetricsSnapshot, MetricsSource, StaticMetrics};
use crate::session::{ConversationMessage, Session, WELCOME_MESSAGE};

/// Shown in place of an answer whenever the service call fails
pub const FALLBACK_MESSAGE: &str = "### Error\n\
Could not connect to the reasoning engine. Please ensure the backend is running and GROQ_API_KEY is set.";

/// Conductor configuration
#[derive(Clone, Debug)]
pub struct ConductorConfig {
    /// Answer service endpoint and timeout
    pub service: ServiceConfig,
    /// Message the conversation log is seeded with
    pub welcome_message: String,
    /// Metrics shown alongside the conversation
    pub metrics: MetricsSnapshot,
}

impl Default for ConductorConfig {
    fn default() -> Self {
        Self {
            service: ServiceConfig::default(),
            welcome_message: WELCOME_MESSAGE.to_string(),
            metrics: MetricsSnapshot::default(),
        }
    }
}

/// What happened to a submitted input
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Appended and sent to the answer service
    Accepted,
    /// Empty after trimming; nothing changed
    Ignored,
    /// A call is already in flight (or the Conductor is shutting down)
    Rejected,
}

type AnswerTask = JoinHandle<Result<String, AnswerError>>;
type HealthTask = JoinHandle<bool>;

/// The Conductor - headless interaction controller
pub struct Conductor<B: AnswerService> {
    /// Configuration
    config: ConductorConfig,
    /// Answer service, shared with the in-flight task
    service: Arc<B>,
    /// Where the metrics panel reads from
    metrics: Box<dyn MetricsSource>,
    /// Conversation log
    session: Session,
    /// Current draft in the input box
    pending_input: String,
    /// Current operational state
    state: ConductorState,
    /// Last health check result (None until checked)
    service_online: Option<bool>,
    /// The answer service call, while one is running
    in_flight: Option<AnswerTask>,
    /// The health check, while it is running
    health_task: Option<HealthTask>,
    /// Channel to send messages to UI surface
    tx: mpsc::Sender<ConductorMessage>,
}

impl<B: AnswerService + 'static> Conductor<B> {
    /// Create a new Conductor with the given answer service
    ///
    /// Metrics come from the configured snapshot; use
    /// [`Conductor::with_metrics_source`] to plug in something live.
    pub fn new(service: B, config: ConductorConfig, tx: mpsc::Sender<ConductorMessage>) -> Self {
        let session = Session::with_welcome(config.welcome_message.clone());
        let metrics = Box::new(StaticMetrics::new(config.metrics.clone()));

        Self {
            config,
            service: Arc::new(service),
            metrics,
            session,
            pending_input: String::new(),
            state: ConductorState::Initializing,
            service_online: None,
            in_flight: None,
            health_task: None,
            tx,
        }
    }

    /// Replace the metrics source
    #[must_use]
    pub fn with_metrics_source(mut self, source: impl MetricsSource + 'static) -> Self {
        self.metrics = Box::new(source);
        self
    }

    /// Get current state
    pub fn state(&self) -> ConductorState {
        self.state
    }

    /// Whether an answer service call is in flight
    pub fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    /// The conversation log
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// All messages in log order
    pub fn messages(&self) -> &[ConversationMessage] {
        self.session.all()
    }

    /// Current draft
    pub fn pending_input(&self) -> &str {
        &self.pending_input
    }

    /// Result of the last health check (false until checked)
    pub fn service_online(&self) -> bool {
        self.service_online.unwrap_or(false)
    }

    /// Configuration in use
    pub fn config(&self) -> &ConductorConfig {
        &self.config
    }

    /// Start the Conductor: launch the health check and become ready
    ///
    /// Returns without waiting for the check; its result arrives through
    /// [`Conductor::poll_health`] or [`Conductor::wait_for_health`]. Calling
    /// `start` again never touches a call in flight or repeats the check.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        if self.state == ConductorState::ShuttingDown {
            return Ok(());
        }

        if self.health_task.is_none() && self.service_online.is_none() {
            let service = Arc::clone(&self.service);
            self.health_task = Some(tokio::spawn(async move { service.health_check().await }));
        }

        if self.state == ConductorState::Initializing {
            self.set_state(ConductorState::Idle).await;
        } else {
            tracing::debug!(state = ?self.state, "Already started");
        }
        Ok(())
    }

    /// Record the health check result if it has finished
    ///
    /// Never blocks. Returns true if a result was recorded.
    pub async fn poll_health(&mut self) -> bool {
        let finished = self
            .health_task
            .as_ref()
            .is_some_and(JoinHandle::is_finished);
        if !finished {
            return false;
        }
        self.wait_for_health().await;
        true
    }

    /// Wait for the health check and record its result
    ///
    /// Returns the last known health (false if never checked).
    pub async fn wait_for_health(&mut self) -> bool {
        if let Some(check) = self.health_task.take() {
            let online = check.await.unwrap_or(false);
            self.service_online = Some(online);
            if online {
                tracing::info!(service = self.service.name(), "Answer service reachable");
            } else {
                tracing::warn!(
                    service = self.service.name(),
                    url = %self.config.service.health_url(),
                    "Answer service not reachable - questions will get the fallback reply"
                );
            }
            self.send(ConductorMessage::Health { online }).await;
        }
        self.service_online()
    }

    /// Handle an event from the UI surface
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> anyhow::Result<()> {
        match event {
            SurfaceEvent::Connected => {
                tracing::info!("Surface connected");

                // Send current state to new surface
                self.send(ConductorMessage::Transcript {
                    messages: self.session.all().to_vec(),
                })
                .await;
                self.send(ConductorMessage::State { state: self.state })
                    .await;
                self.send(ConductorMessage::Metrics {
                    snapshot: self.metrics.snapshot(),
                })
                .await;
                if let Some(online) = self.service_online {
                    self.send(ConductorMessage::Health { online }).await;
                }
            }

            SurfaceEvent::InputChanged { text } => {
                self.pending_input = text;
            }

            SurfaceEvent::Submit { content } => {
                self.submit(&content).await;
            }

            SurfaceEvent::QuitRequested => {
                self.shutdown().await?;
            }
        }

        Ok(())
    }

    /// Submit a question
    ///
    /// On acceptance the user message is appended verbatim (untrimmed), the
    /// pending input is cleared and the answer service call is started in
    /// the background. The answer lands in the log once
    /// [`Conductor::poll_response`] or [`Conductor::wait_for_response`]
    /// observes the finished call.
    pub async fn submit(&mut self, raw_input: &str) -> SubmitOutcome {
        if raw_input.trim().is_empty() {
            tracing::debug!("Ignoring empty submission");
            return SubmitOutcome::Ignored;
        }

        if self.is_busy() || self.state == ConductorState::ShuttingDown {
            tracing::debug!(state = ?self.state, "Rejecting submission");
            return SubmitOutcome::Rejected;
        }

        tracing::debug!(chars = raw_input.chars().count(), "Accepted submission");

        self.append(ConversationMessage::user(raw_input)).await;

        self.pending_input.clear();
        self.send(ConductorMessage::PendingInput {
            text: String::new(),
        })
        .await;

        self.set_state(ConductorState::AwaitingResponse).await;

        let service = Arc::clone(&self.service);
        let question = raw_input.to_string();
        let timeout = self.config.service.timeout;
        self.in_flight = Some(tokio::spawn(async move {
            match tokio::time::timeout(timeout, service.ask(&question)).await {
                Ok(result) => result,
                Err(_) => Err(AnswerError::Timeout(timeout)),
            }
        }));

        SubmitOutcome::Accepted
    }

    /// Resolve the in-flight call if it has finished
    ///
    /// Never blocks. Call this regularly (once per frame).
    /// Returns true if a reply was appended.
    pub async fn poll_response(&mut self) -> bool {
        let finished = self
            .in_flight
            .as_ref()
            .is_some_and(JoinHandle::is_finished);
        if !finished {
            return false;
        }

        match self.in_flight.take() {
            Some(task) => {
                let joined = task.await;
                self.resolve(joined).await;
                true
            }
            None => false,
        }
    }

    /// Wait for the in-flight call and resolve it
    ///
    /// Returns false if nothing was in flight.
    pub async fn wait_for_response(&mut self) -> bool {
        match self.in_flight.take() {
            Some(task) => {
                let joined = task.await;
                self.resolve(joined).await;
                true
            }
            None => false,
        }
    }

    /// Append the reply for a finished call and clear busy
    async fn resolve(&mut self, joined: Result<Result<String, AnswerError>, JoinError>) {
        let result = joined.unwrap_or_else(|e| Err(AnswerError::Aborted(e.to_string())));

        let reply = match result {
            Ok(answer) => answer,
            Err(e) => {
                tracing::warn!(
                    service = self.service.name(),
                    error = %e,
                    "Answer service call failed"
                );
                FALLBACK_MESSAGE.to_string()
            }
        };

        self.append(ConversationMessage::ai(reply)).await;
        self.set_state(ConductorState::Idle).await;
    }

    /// Shut down the Conductor
    ///
    /// An in-flight call is aborted and its reply discarded.
    pub async fn shutdown(&mut self) -> anyhow::Result<()> {
        if let Some(task) = self.in_flight.take() {
            tracing::info!("Aborting in-flight answer service call");
            task.abort();
        }
        if let Some(check) = self.health_task.take() {
            check.abort();
        }

        self.set_state(ConductorState::ShuttingDown).await;

        // Send quit to UI
        self.send(ConductorMessage::Quit {
            message: Some("Goodbye!".to_string()),
        })
        .await;

        Ok(())
    }

    /// Append to the log and notify UI
    async fn append(&mut self, message: ConversationMessage) {
        let index = self.session.append(message.clone());
        self.send(ConductorMessage::MessageAppended { index, message })
            .await;
    }

    /// Set state and notify UI
    async fn set_state(&mut self, state: ConductorState) {
        self.state = state;
        self.send(ConductorMessage::State { state }).await;
    }

    /// Send a message to the UI surface
    async fn send(&self, msg: ConductorMessage) {
        if let Err(e) = self.tx.send(msg).await {
            tracing::warn!("Failed to send message to surface: {}", e);
        }
    }
}

impl<B: AnswerService> Drop for Conductor<B> {
    fn drop(&mut self) {
        if let Some(task) = self.in_flight.take() {
            task.abort();
        }
        if let Some(check) = self.health_task.take() {
            check.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messages::MessageRole;
    use std::time::Duration;
    use tokio::sync::Notify;

    // Mock service for testing
    struct MockService {
        reply: Result<String, u16>,
        gate: Option<Arc<Notify>>,
        health_gate: Option<Arc<Notify>>,
    }

    impl MockService {
        fn answering(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                gate: None,
                health_gate: None,
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                gate: None,
                health_gate: None,
            }
        }

        fn gated(text: &str, gate: Arc<Notify>) -> Self {
            Self {
                reply: Ok(text.to_string()),
                gate: Some(gate),
                health_gate: None,
            }
        }

        fn slow_health(mut self, gate: Arc<Notify>) -> Self {
            self.health_gate = Some(gate);
            self
        }
    }

    #[async_trait::async_trait]
    impl AnswerService for MockService {
        fn name(&self) -> &str {
            "Mock"
        }

        async fn health_check(&self) -> bool {
            if let Some(gate) = &self.health_gate {
                gate.notified().await;
            }
            true
        }

        async fn ask(&self, _question: &str) -> Result<String, AnswerError> {
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            self.reply.clone().map_err(AnswerError::Status)
        }
    }

    fn make_conductor(
        service: MockService,
    ) -> (Conductor<MockService>, mpsc::Receiver<ConductorMessage>) {
        let (tx, rx) = mpsc::channel(100);
        (Conductor::new(service, ConductorConfig::default(), tx), rx)
    }

    #[tokio::test]
    async fn test_conductor_creation() {
        let (conductor, _rx) = make_conductor(MockService::answering("hi"));

        assert_eq!(conductor.state(), ConductorState::Initializing);
        assert_eq!(conductor.messages().len(), 1);
        assert_eq!(conductor.messages()[0].text, WELCOME_MESSAGE);
        assert_eq!(conductor.messages()[0].role, MessageRole::Ai);
    }

    #[tokio::test]
    async fn test_conductor_start() {
        let (mut conductor, mut rx) = make_conductor(MockService::answering("hi"));

        conductor.start().await.unwrap();

        assert_eq!(conductor.state(), ConductorState::Idle);
        assert!(conductor.wait_for_health().await);
        assert!(conductor.service_online());

        let msg = rx.recv().await.unwrap();
        assert!(matches!(msg, ConductorMessage::State { .. }));
        let msg = rx.recv().await.unwrap();
        assert!(matches!(msg, ConductorMessage::Health { online: true }));
    }

    #[tokio::test]
    async fn test_start_does_not_wait_for_health_check() {
        let health_gate = Arc::new(Notify::new());
        let (mut conductor, _rx) = make_conductor(
            MockService::answering("hi").slow_health(Arc::clone(&health_gate)),
        );

        tokio::time::timeout(Duration::from_secs(1), conductor.start())
            .await
            .expect("start returns while the check is pending")
            .unwrap();
        assert_eq!(conductor.state(), ConductorState::Idle);
        assert!(!conductor.poll_health().await);

        // Questions are accepted before the check answers
        assert_eq!(conductor.submit("early").await, SubmitOutcome::Accepted);
        conductor.wait_for_response().await;

        health_gate.notify_one();
        assert!(conductor.wait_for_health().await);
    }

    #[tokio::test]
    async fn test_restart_keeps_call_in_flight() {
        let gate = Arc::new(Notify::new());
        let (mut conductor, _rx) = make_conductor(MockService::gated("answer", gate.clone()));
        conductor.start().await.unwrap();

        assert_eq!(conductor.submit("one").await, SubmitOutcome::Accepted);
        conductor.start().await.unwrap();

        assert!(conductor.is_busy());
        assert_eq!(conductor.submit("two").await, SubmitOutcome::Rejected);

        gate.notify_one();
        assert!(conductor.wait_for_response().await);

        let texts: Vec<_> = conductor.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec![WELCOME_MESSAGE, "one", "answer"]);
        assert!(!conductor.is_busy());
    }

    #[tokio::test]
    async fn test_connect_before_start_omits_health() {
        let (mut conductor, mut rx) = make_conductor(MockService::answering("hi"));

        conductor
            .handle_event(SurfaceEvent::Connected)
            .await
            .unwrap();

        let mut msgs = Vec::new();
        while let Ok(msg) = rx.try_recv() {
            msgs.push(msg);
        }
        assert_eq!(msgs.len(), 3);
        assert!(!msgs
            .iter()
            .any(|m| matches!(m, ConductorMessage::Health { .. })));
    }

    #[tokio::test]
    async fn test_connect_reads_metrics_source() {
        struct Live;
        impl MetricsSource for Live {
            fn snapshot(&self) -> MetricsSnapshot {
                MetricsSnapshot {
                    churn_rate: "9.9%".to_string(),
                    ..MetricsSnapshot::default()
                }
            }
        }

        let (conductor, mut rx) = make_conductor(MockService::answering("hi"));
        let mut conductor = conductor.with_metrics_source(Live);
        conductor
            .handle_event(SurfaceEvent::Connected)
            .await
            .unwrap();

        let mut churn = None;
        while let Ok(msg) = rx.try_recv() {
            if let ConductorMessage::Metrics { snapshot } = msg {
                churn = Some(snapshot.churn_rate);
            }
        }
        assert_eq!(churn.as_deref(), Some("9.9%"));
    }

    #[tokio::test]
    async fn test_submit_and_wait() {
        let (mut conductor, _rx) = make_conductor(MockService::answering("### Result\nDone."));
        conductor.start().await.unwrap();

        assert_eq!(conductor.submit("  hello ").await, SubmitOutcome::Accepted);
        assert!(conductor.is_busy());
        assert!(conductor.wait_for_response().await);

        let messages = conductor.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].text, "  hello ");
        assert_eq!(messages[2].text, "### Result\nDone.");
        assert!(!conductor.is_busy());
    }

    #[tokio::test]
    async fn test_whitespace_is_ignored() {
        let (mut conductor, _rx) = make_conductor(MockService::answering("x"));
        conductor.start().await.unwrap();

        assert_eq!(conductor.submit("").await, SubmitOutcome::Ignored);
        assert_eq!(conductor.submit(" \n\t ").await, SubmitOutcome::Ignored);
        assert_eq!(conductor.messages().len(), 1);
        assert!(!conductor.is_busy());
        assert!(!conductor.wait_for_response().await);
    }

    #[tokio::test]
    async fn test_failure_appends_fallback() {
        let (mut conductor, _rx) = make_conductor(MockService::failing(503));
        conductor.start().await.unwrap();

        conductor.submit("q").await;
        conductor.wait_for_response().await;

        assert_eq!(conductor.session().last().unwrap().text, FALLBACK_MESSAGE);
        assert!(!conductor.is_busy());
    }

    #[tokio::test]
    async fn test_busy_rejects_second_submit_and_poll_does_not_block() {
        let gate = Arc::new(Notify::new());
        let (mut conductor, _rx) = make_conductor(MockService::gated("answer", gate.clone()));
        conductor.start().await.unwrap();

        assert_eq!(conductor.submit("first").await, SubmitOutcome::Accepted);
        assert_eq!(conductor.submit("second").await, SubmitOutcome::Rejected);
        assert!(!conductor.poll_response().await);
        assert_eq!(conductor.messages().len(), 2);

        gate.notify_one();
        tokio::time::timeout(Duration::from_secs(2), async {
            while !conductor.poll_response().await {
                tokio::task::yield_now().await;
            }
        })
        .await
        .unwrap();

        assert_eq!(conductor.messages().len(), 3);
        assert!(!conductor.is_busy());
    }

    #[tokio::test]
    async fn test_shutdown_aborts_in_flight_call() {
        let gate = Arc::new(Notify::new());
        let (mut conductor, _rx) = make_conductor(MockService::gated("never", gate));
        conductor.start().await.unwrap();

        conductor.submit("q").await;
        conductor.shutdown().await.unwrap();

        assert_eq!(conductor.state(), ConductorState::ShuttingDown);
        assert!(!conductor.is_busy());
        assert_eq!(conductor.messages().len(), 2);
        assert_eq!(conductor.submit("late").await, SubmitOutcome::Rejected);
    }
}
