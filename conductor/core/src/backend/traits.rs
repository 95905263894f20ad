//! Answer Service Traits
//!
//! Trait definitions for the reasoning service. The Conductor only knows
//! "submit text, receive text or fail"; how the question travels is the
//! implementation's business.
//!
//! # Design Philosophy
//!
//! Every failure is an [`AnswerError`], but the Conductor does not branch on
//! the variant. Variants exist so logs say what went wrong. Users always see
//! the same fallback message.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// Why an answer could not be obtained
#[derive(Debug, Error)]
pub enum AnswerError {
    /// Network or protocol failure before a response arrived
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service responded with a non-success status
    #[error("service returned status {0}")]
    Status(u16),

    /// The response body was not the expected shape
    #[error("malformed response: {0}")]
    Malformed(String),

    /// No response within the configured timeout
    #[error("no answer within {0:?}")]
    Timeout(Duration),

    /// The request task ended without producing a result
    #[error("request aborted: {0}")]
    Aborted(String),
}

/// The reasoning service
///
/// Implement this trait to plug in a different transport (or a mock).
#[async_trait]
pub trait AnswerService: Send + Sync {
    /// Get the service name (for logs)
    fn name(&self) -> &str;

    /// Check if the service is reachable
    async fn health_check(&self) -> bool;

    /// Ask a question and wait for the complete answer
    async fn ask(&self, question: &str) -> Result<String, AnswerError>;
}

/// Connection settings for the HTTP answer service
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Base URL, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Path of the ask endpoint, e.g. `/ask`
    pub ask_path: String,
    /// Per-request timeout
    pub timeout: Duration,
}

/// Default base URL of the reasoning service
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default ask endpoint path
pub const DEFAULT_ASK_PATH: &str = "/ask";

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            ask_path: DEFAULT_ASK_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServiceConfig {
    /// Create a configuration for a base URL with default path and timeout
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the ask path
    #[must_use]
    pub fn with_ask_path(mut self, ask_path: impl Into<String>) -> Self {
        self.ask_path = ask_path.into();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Full URL of the ask endpoint
    #[must_use]
    pub fn ask_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.ask_path)
    }

    /// URL requested by the health check
    #[must_use]
    pub fn health_url(&self) -> String {
        format!("{}/", self.base_url.trim_end_matches('/'))
    }
}
