//! Custom widgets

pub mod metrics_panel;
pub mod transcript;

pub use metrics_panel::MetricsPanel;
pub use transcript::{Transcript, TranscriptState, THINKING_TEXT};
