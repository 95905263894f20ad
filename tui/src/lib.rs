//! Insight TUI - Terminal surface for insight-desk
//!
//! A full-screen chat with the decision intelligence engine: a scrolling
//! transcript with formatted answers, an input line and a metrics panel.
//!
//! # Architecture
//!
//! - **App**: Event loop, key handling and layout
//! - **ConductorClient**: Embedded Conductor plus its message channel
//! - **Display**: State derived from Conductor messages
//! - **Widgets**: Transcript (formatted, follow-bottom) and metrics panel

pub mod app;
pub mod conductor_client;
pub mod display;
pub mod theme;
pub mod widgets;

pub use app::App;
pub use conductor_client::ConductorClient;
pub use display::{DisplayMessage, DisplayRole, DisplayState};
