//! HTTP Answer Service
//!
//! Talks to the decision intelligence API over JSON:
//!
//! - `POST {base_url}{ask_path}` with `{"message": "<question>"}`, answered
//!   by `{"answer": "<markdown-ish text>"}`
//! - `GET {base_url}/` as a liveness check
//!
//! Status codes and error bodies are not interpreted beyond success or
//! failure.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::traits::{AnswerError, AnswerService, ServiceConfig};

/// Health check timeout, independent of the ask timeout
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize)]
struct AskRequest<'a> {
    message: &'a str,
}

#[derive(Deserialize)]
struct AskResponse {
    answer: String,
}

/// Answer service client over HTTP
#[derive(Clone)]
pub struct HttpAnswerService {
    /// Endpoint configuration
    config: ServiceConfig,
    /// HTTP client
    http_client: reqwest::Client,
}

impl HttpAnswerService {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Fails if the TLS backend cannot be initialised.
    pub fn new(config: ServiceConfig) -> Result<Self, AnswerError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Endpoint configuration
    #[must_use]
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }
}

#[async_trait]
impl AnswerService for HttpAnswerService {
    fn name(&self) -> &'static str {
        "HTTP"
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(self.config.health_url())
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::debug!(error = %e, "Health check failed");
                false
            }
        }
    }

    async fn ask(&self, question: &str) -> Result<String, AnswerError> {
        let url = self.config.ask_url();
        tracing::debug!(url = %url, "Sending question");

        let response = self
            .http_client
            .post(&url)
            .json(&AskRequest { message: question })
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AnswerError::Timeout(self.config.timeout)
                } else {
                    AnswerError::Transport(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AnswerError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: AskResponse =
            serde_json::from_str(&body).map_err(|e| AnswerError::Malformed(e.to_string()))?;

        Ok(parsed.answer)
    }
}
