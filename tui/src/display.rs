//! Display State Types
//!
//! Types that represent the current display state for the TUI.
//! These are derived from ConductorMessages and used for rendering.
//!
//! # Design Philosophy
//!
//! The TUI is a "thin client" - it just renders what the Conductor tells it to.
//! Display state is the bridge between ConductorMessages and rendering.
//!
//! - DisplayMessage: A conversation message as the surface knows it
//! - DisplayState: Everything the next frame needs
//!
//! Display blocks are not stored here; the transcript widget derives them
//! from message text on every render.

use std::time::Duration;

use insight_conductor::{
    ConductorMessage, ConductorState, ConversationMessage, MessageId, MessageRole,
    MetricsSnapshot,
};

/// How long one phase of the thinking pulse lasts
const PULSE_PERIOD: Duration = Duration::from_millis(400);

/// A conversation message as rendered
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DisplayMessage {
    /// Unique message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: DisplayRole,
    /// Raw message text
    pub content: String,
}

impl From<ConversationMessage> for DisplayMessage {
    fn from(msg: ConversationMessage) -> Self {
        Self {
            id: msg.id,
            role: msg.role.into(),
            content: msg.text,
        }
    }
}

/// Display role for messages
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DisplayRole {
    /// User input
    User,
    /// Reasoning service
    Ai,
}

impl From<MessageRole> for DisplayRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => DisplayRole::User,
            MessageRole::Ai => DisplayRole::Ai,
        }
    }
}

impl DisplayRole {
    /// Speaker label shown above the message
    pub fn label(&self) -> &'static str {
        match self {
            DisplayRole::User => "You",
            DisplayRole::Ai => "Insight",
        }
    }
}

/// The full display state for the TUI
#[derive(Debug)]
pub struct DisplayState {
    /// Conversation messages, in log order
    pub messages: Vec<DisplayMessage>,
    /// Conductor state
    pub conductor_state: ConductorState,
    /// Draft text as last confirmed by the Conductor
    pub pending_input: Option<String>,
    /// Metrics panel contents
    pub metrics: Option<MetricsSnapshot>,
    /// Answer service health (None until checked)
    pub service_online: Option<bool>,
    /// Goodbye text from a Quit message
    pub goodbye: Option<String>,
    /// Time spent in the current thinking phase
    pulse_elapsed: Duration,
    /// Current thinking phase
    pulse_on: bool,
}

impl Default for DisplayState {
    fn default() -> Self {
        Self {
            messages: Vec::new(),
            conductor_state: ConductorState::Initializing,
            pending_input: None,
            metrics: None,
            service_online: None,
            goodbye: None,
            pulse_elapsed: Duration::ZERO,
            pulse_on: true,
        }
    }
}

impl DisplayState {
    /// Create a new display state
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a ConductorMessage to update display state
    pub fn apply_message(&mut self, msg: ConductorMessage) {
        match msg {
            // Conversation messages
            ConductorMessage::Transcript { messages } => {
                self.messages = messages.into_iter().map(DisplayMessage::from).collect();
            }
            ConductorMessage::MessageAppended { index, message } => {
                let message = DisplayMessage::from(message);
                if index < self.messages.len() {
                    // Already known from a transcript snapshot
                    self.messages[index] = message;
                } else {
                    if index > self.messages.len() {
                        tracing::debug!(
                            index,
                            known = self.messages.len(),
                            "Appended message skips ahead of local log"
                        );
                    }
                    self.messages.push(message);
                }
            }
            ConductorMessage::PendingInput { text } => {
                self.pending_input = Some(text);
            }

            // System messages
            ConductorMessage::State { state } => {
                if state.is_busy() != self.conductor_state.is_busy() {
                    self.pulse_elapsed = Duration::ZERO;
                    self.pulse_on = true;
                }
                self.conductor_state = state;
            }
            ConductorMessage::Metrics { snapshot } => {
                self.metrics = Some(snapshot);
            }
            ConductorMessage::Health { online } => {
                self.service_online = Some(online);
            }
            ConductorMessage::Quit { message } => {
                self.goodbye = message;
            }
        }
    }

    /// Update timers and animations
    pub fn update(&mut self, delta: Duration) {
        if !self.is_busy() {
            return;
        }
        self.pulse_elapsed += delta;
        while self.pulse_elapsed >= PULSE_PERIOD {
            self.pulse_elapsed -= PULSE_PERIOD;
            self.pulse_on = !self.pulse_on;
        }
    }

    /// Whether an answer is being waited for
    pub fn is_busy(&self) -> bool {
        self.conductor_state.is_busy()
    }

    /// Whether the thinking indicator is in its bright phase
    pub fn pulse_on(&self) -> bool {
        self.pulse_on
    }

    /// Take the draft the Conductor asked the surface to show
    pub fn take_pending_input(&mut self) -> Option<String> {
        self.pending_input.take()
    }

    /// Whether the surface should close
    pub fn should_quit(&self) -> bool {
        self.conductor_state == ConductorState::ShuttingDown
    }
}
