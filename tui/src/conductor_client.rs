//! Conductor Client
//!
//! Thin wrapper around the Conductor for TUI integration.
//! This client embeds the Conductor directly (no network between them) and
//! provides a convenient interface for sending events and receiving messages.
//!
//! # Architecture
//!
//! The TUI is a "thin client" - it doesn't contain any business logic.
//! All orchestration happens in the Conductor. The TUI's job is:
//! 1. Convert terminal events to SurfaceEvents
//! 2. Send SurfaceEvents to Conductor
//! 3. Receive ConductorMessages
//! 4. Render display state based on messages

use tokio::sync::mpsc;

use insight_conductor::{
    AnswerService, Conductor, ConductorConfig, ConductorMessage, ConductorState,
    HttpAnswerService, SubmitOutcome, SurfaceEvent,
};

/// Conductor -> surface channel depth
const CHANNEL_CAPACITY: usize = 100;

/// Client for communicating with the embedded Conductor
pub struct ConductorClient<B: AnswerService = HttpAnswerService> {
    /// The embedded Conductor instance
    conductor: Conductor<B>,
    /// Receiver for messages from Conductor
    rx: mpsc::Receiver<ConductorMessage>,
}

impl ConductorClient<HttpAnswerService> {
    /// Create a client talking to the configured HTTP answer service
    pub fn new(config: ConductorConfig) -> anyhow::Result<Self> {
        let service = HttpAnswerService::new(config.service.clone())?;
        Ok(Self::with_service(service, config))
    }
}

impl<B: AnswerService + 'static> ConductorClient<B> {
    /// Create a client around any answer service
    pub fn with_service(service: B, config: ConductorConfig) -> Self {
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);
        let conductor = Conductor::new(service, config, tx);
        Self { conductor, rx }
    }

    /// Start the Conductor; the health check runs in the background
    pub async fn start(&mut self) -> anyhow::Result<()> {
        self.conductor.start().await
    }

    /// Connect this surface to the Conductor
    pub async fn connect(&mut self) -> anyhow::Result<()> {
        self.conductor.handle_event(SurfaceEvent::Connected).await
    }

    /// Tell the Conductor what is in the input box
    pub async fn input_changed(&mut self, text: String) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::InputChanged { text })
            .await
    }

    /// Submit the input box contents
    pub async fn submit(&mut self, content: &str) -> SubmitOutcome {
        self.conductor.submit(content).await
    }

    /// Notify Conductor that user wants to quit
    pub async fn request_quit(&mut self) -> anyhow::Result<()> {
        self.conductor
            .handle_event(SurfaceEvent::QuitRequested)
            .await
    }

    /// Resolve a finished answer call (must be called regularly)
    pub async fn poll_response(&mut self) -> bool {
        self.conductor.poll_response().await
    }

    /// Wait for the in-flight answer call
    pub async fn wait_for_response(&mut self) -> bool {
        self.conductor.wait_for_response().await
    }

    /// Record a finished health check (must be called regularly)
    pub async fn poll_health(&mut self) -> bool {
        self.conductor.poll_health().await
    }

    /// Wait for the health check result
    pub async fn wait_for_health(&mut self) -> bool {
        self.conductor.wait_for_health().await
    }

    /// Receive all pending messages from the Conductor (non-blocking)
    pub fn recv_all(&mut self) -> Vec<ConductorMessage> {
        let mut messages = Vec::new();
        while let Ok(msg) = self.rx.try_recv() {
            messages.push(msg);
        }
        messages
    }

    /// Get the current Conductor state
    pub fn state(&self) -> ConductorState {
        self.conductor.state()
    }

    /// Whether an answer is being waited for
    pub fn is_busy(&self) -> bool {
        self.conductor.is_busy()
    }

    /// The embedded Conductor, read-only
    pub fn conductor(&self) -> &Conductor<B> {
        &self.conductor
    }
}
