//! Session Management
//!
//! The conversation store: an ordered, append-only log of messages between
//! the user and the reasoning service.
//!
//! # Design Philosophy
//!
//! The log only grows. There is no edit, delete or clear operation, and a
//! message never changes after it is created. Render order is insertion
//! order. Only the Conductor holds a `&mut Session`, so every append is
//! paired with a `MessageAppended` notification to the surface.

use serde::{Deserialize, Serialize};

use crate::format::{format_text, DisplayBlock};
use crate::messages::{MessageId, MessageRole};

/// Welcome text the log is seeded with
pub const WELCOME_MESSAGE: &str = "### Welcome to Decision Intelligence\n\
I am connected to your enterprise data and ML pipelines. \
How can I assist you with business reasoning today?";

/// A message in the conversation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Unique message ID
    pub id: MessageId,
    /// Who sent this message
    pub role: MessageRole,
    /// Raw message text, exactly as typed or received
    pub text: String,
    /// When the message was created (Unix timestamp ms)
    pub timestamp: u64,
}

impl ConversationMessage {
    /// Create a new message
    pub fn new(role: MessageRole, text: impl Into<String>) -> Self {
        Self {
            id: MessageId::new(),
            role,
            text: text.into(),
            timestamp: now_ms(),
        }
    }

    /// Create a user message
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(MessageRole::User, text)
    }

    /// Create a reasoning service message
    pub fn ai(text: impl Into<String>) -> Self {
        Self::new(MessageRole::Ai, text)
    }

    /// Derive display blocks for this message
    ///
    /// Recomputed on every call; blocks are never stored.
    #[must_use]
    pub fn blocks(&self) -> Vec<DisplayBlock> {
        format_text(&self.text)
    }
}

/// A conversation session
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Session {
    /// Conversation history
    messages: Vec<ConversationMessage>,
}

impl Session {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session seeded with one welcome message from the service
    pub fn with_welcome(welcome: impl Into<String>) -> Self {
        let mut session = Self::new();
        session.append(ConversationMessage::ai(welcome));
        session
    }

    /// Append a message to the end of the log, returning its index
    pub fn append(&mut self, message: ConversationMessage) -> usize {
        tracing::trace!(role = message.role.as_str(), id = %message.id.0, "Appending message");
        self.messages.push(message);
        self.messages.len() - 1
    }

    /// All messages in log order
    pub fn all(&self) -> &[ConversationMessage] {
        &self.messages
    }

    /// The most recent message
    pub fn last(&self) -> Option<&ConversationMessage> {
        self.messages.last()
    }

    /// Number of messages in the log
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

/// Get current timestamp in milliseconds
fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
