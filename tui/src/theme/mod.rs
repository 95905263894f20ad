//! Theme and Colors
//!
//! A calm analytics palette: teal accents for the assistant, green for the
//! user, amber for warnings and grays for chrome.

use ratatui::style::{Color, Modifier, Style};

use crate::display::DisplayRole;

// ============================================================================
// Brand Palette
// ============================================================================

/// Assistant accent - teal
pub const INSIGHT_TEAL: Color = Color::Rgb(64, 196, 190);

/// Headings inside answers
pub const HEADING_TEAL: Color = Color::Rgb(120, 226, 220);

/// List bullets
pub const BULLET_AMBER: Color = Color::Rgb(240, 190, 90);

/// Thinking indicator, bright phase
pub const THINKING_BRIGHT: Color = Color::Rgb(150, 180, 255);

/// Thinking indicator, dim phase
pub const THINKING_DIM: Color = Color::Rgb(90, 110, 170);

// ============================================================================
// UI Colors
// ============================================================================

/// User input green
pub const USER_GREEN: Color = Color::Rgb(130, 220, 130);

/// Answer body text
pub const BODY_TEXT: Color = Color::Rgb(220, 220, 220);

/// System/dim text
pub const DIM_GRAY: Color = Color::Rgb(100, 100, 100);

/// Error red
pub const ERROR_RED: Color = Color::Rgb(255, 80, 80);

/// Success green
pub const SUCCESS_GREEN: Color = Color::Rgb(120, 230, 120);

/// Metric values
pub const METRIC_VALUE: Color = Color::Rgb(255, 255, 255);

/// Style of the speaker label above a message
pub fn role_style(role: DisplayRole) -> Style {
    match role {
        DisplayRole::User => Style::default().fg(USER_GREEN).add_modifier(Modifier::BOLD),
        DisplayRole::Ai => Style::default()
            .fg(INSIGHT_TEAL)
            .add_modifier(Modifier::BOLD),
    }
}

/// Style of a message body line
pub fn body_style(role: DisplayRole) -> Style {
    match role {
        DisplayRole::User => Style::default().fg(USER_GREEN),
        DisplayRole::Ai => Style::default().fg(BODY_TEXT),
    }
}

/// Style of a heading block
pub fn heading_style() -> Style {
    Style::default()
        .fg(HEADING_TEAL)
        .add_modifier(Modifier::BOLD)
}
