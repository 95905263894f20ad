//! Answer Service Integration
//!
//! This module provides abstracted access to the reasoning service through
//! a common trait interface.
//!
//! # Available Services
//!
//! - **HTTP**: JSON `POST` to the decision intelligence API (default)
//!
//! # Usage
//!
//! ```ignore
//! use insight_conductor::backend::{AnswerService, HttpAnswerService, ServiceConfig};
//!
//! let service = HttpAnswerService::new(ServiceConfig::default())?;
//! let answer = service.ask("Why is churn high in the North region?").await?;
//! ```

mod http;
mod traits;

pub use http::HttpAnswerService;
pub use traits::{
    AnswerError, AnswerService, ServiceConfig, DEFAULT_ASK_PATH, DEFAULT_BASE_URL,
    DEFAULT_TIMEOUT,
};
