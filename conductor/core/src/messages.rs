//! Conductor Messages
//!
//! Messages sent from the Conductor to UI surfaces. These are the only way
//! a surface learns about conversation changes, busy state and metrics.
//!
//! # Design Philosophy
//!
//! The Conductor owns the conversation log, the busy flag and the pending
//! input. Surfaces are read-only observers: they apply these messages to
//! their own display state and re-render. A surface never reads Conductor
//! state directly.

use serde::{Deserialize, Serialize};

use crate::metrics::MetricsSnapshot;
use crate::session::ConversationMessage;

/// Messages from Conductor to UI Surface
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum ConductorMessage {
    // ============================================
    // Conversation Messages
    // ============================================
    /// Full transcript snapshot, sent when a surface connects
    Transcript {
        /// Every message in log order
        messages: Vec<ConversationMessage>,
    },

    /// A message was appended to the log
    MessageAppended {
        /// Position of the message in the log
        index: usize,
        /// The appended message
        message: ConversationMessage,
    },

    /// The pending input draft changed (cleared on submit)
    PendingInput {
        /// Current draft text
        text: String,
    },

    // ============================================
    // System Messages
    // ============================================
    /// Conductor state change
    State {
        /// The new state
        state: ConductorState,
    },

    /// Metrics to show alongside the conversation
    Metrics {
        /// The current snapshot
        snapshot: MetricsSnapshot,
    },

    /// Result of the answer service health check
    Health {
        /// Whether the service answered the health check
        online: bool,
    },

    /// Request surface to quit
    Quit {
        /// Optional goodbye message
        message: Option<String>,
    },
}

/// Message identifier
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub String);

impl MessageId {
    /// Generate a new unique message ID
    pub fn new() -> Self {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        Self(format!("msg_{id}"))
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

/// Who authored a message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// User input
    User,
    /// The reasoning service (or the fallback standing in for it)
    Ai,
}

impl MessageRole {
    /// Wire name, matching the `role` field of the data model
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Ai => "ai",
        }
    }
}

/// Conductor operational states
///
/// A conversation turn moves `Idle -> AwaitingResponse -> Idle`. The busy
/// flag is exactly `state == AwaitingResponse`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConductorState {
    /// Starting up, not yet accepting input
    Initializing,
    /// Ready for input
    Idle,
    /// An answer service call is in flight
    AwaitingResponse,
    /// Shutting down
    ShuttingDown,
}

impl ConductorState {
    /// Human-readable description
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Initializing => "Starting up...",
            Self::Idle => "Ready",
            Self::AwaitingResponse => "Reasoning...",
            Self::ShuttingDown => "Shutting down...",
        }
    }

    /// Whether an answer service call is in flight
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::AwaitingResponse)
    }
}
