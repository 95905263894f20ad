//! Insight Conductor - Headless Core of the Decision Intelligence Desk
//!
//! This crate holds everything about a conversation with the reasoning
//! service that is not drawing: the message log, the request lifecycle,
//! answer formatting and the metrics panel data. It can drive a TUI or run
//! headless for testing/automation.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                       UI Surfaces                          │
//! │        ┌─────────────┐          ┌──────────────────┐       │
//! │        │     TUI     │          │ Headless (--ask) │       │
//! │        │  (ratatui)  │          │   / test harness │       │
//! │        └──────┬──────┘          └────────┬─────────┘       │
//! │               └────────────┬─────────────┘                 │
//! │                    SurfaceEvent (up)                       │
//! │                  ConductorMessage (down)                   │
//! └────────────────────────────┼───────────────────────────────┘
//!                              │
//! ┌────────────────────────────┼───────────────────────────────┐
//! │                     INSIGHT CONDUCTOR                       │
//! │  ┌─────────────────────────┴─────────────────────────────┐ │
//! │  │                      Conductor                         │ │
//! │  │  ┌──────────┐  ┌──────────┐  ┌──────────────────────┐ │ │
//! │  │  │ Session  │  │ Metrics  │  │  AnswerService (HTTP) │ │ │
//! │  │  └──────────┘  └──────────┘  └──────────────────────┘ │ │
//! │  └───────────────────────────────────────────────────────┘ │
//! │            format: answer text -> display blocks            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Key Types
//!
//! - [`Conductor`]: Owns the log, the busy flag and the pending input
//! - [`ConductorMessage`]: Messages sent from Conductor to UI surfaces
//! - [`SurfaceEvent`]: Events sent from UI surfaces to Conductor
//! - [`Session`]: Append-only conversation log
//! - [`DisplayBlock`]: Heading, list item or paragraph derived from text
//!
//! # Quick Start
//!
//! ```no_run
//! use insight_conductor::{
//!     Conductor, ConductorConfig, HttpAnswerService, ServiceConfig, SurfaceEvent,
//! };
//! use tokio::sync::mpsc;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let (tx, mut rx) = mpsc::channel(100);
//!
//! let config = ConductorConfig::default();
//! let service = HttpAnswerService::new(config.service.clone())?;
//! let mut conductor = Conductor::new(service, config, tx);
//!
//! conductor.start().await?;
//! conductor.handle_event(SurfaceEvent::Connected).await?;
//!
//! conductor
//!     .handle_event(SurfaceEvent::Submit {
//!         content: "Why is churn high?".to_string(),
//!     })
//!     .await?;
//!
//! // Main loop: render messages, then poll the in-flight call
//! loop {
//!     while let Ok(_msg) = rx.try_recv() {
//!         // Apply to display state
//!     }
//!     if conductor.poll_response().await {
//!         break;
//!     }
//!     # tokio::task::yield_now().await;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Overview
//!
//! - [`backend`]: Answer service abstraction and the HTTP client
//! - [`conductor`]: Main Conductor struct
//! - [`config`]: TOML/env/CLI configuration loading
//! - [`events`]: Events from UI surfaces to Conductor
//! - [`format`]: Answer text to display blocks
//! - [`messages`]: Messages from Conductor to UI surfaces
//! - [`metrics`]: Metrics panel data
//! - [`session`]: Conversation log
//!
//! # No TUI Dependencies
//!
//! This crate has **zero** dependencies on ratatui, crossterm, or any other
//! UI framework.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod conductor;
pub mod config;
pub mod events;
pub mod format;
pub mod messages;
pub mod metrics;
pub mod session;

// Re-exports for convenience
pub use backend::{AnswerError, AnswerService, HttpAnswerService, ServiceConfig};
pub use conductor::{Conductor, ConductorConfig, SubmitOutcome, FALLBACK_MESSAGE};
pub use events::SurfaceEvent;
pub use format::{format_text, group_blocks, BlockGroup, DisplayBlock};
pub use messages::{ConductorMessage, ConductorState, MessageId, MessageRole};
pub use metrics::{freshness_label, MetricsSnapshot, MetricsSource, PipelineStatus, StaticMetrics};
pub use session::{ConversationMessage, Session, WELCOME_MESSAGE};

// Config exports
pub use config::{
    default_config_path, load_config_from_path, ConfigError, ConfigOverrides,
    ConfigSource, InsightToml, LoadedConfig,
};
