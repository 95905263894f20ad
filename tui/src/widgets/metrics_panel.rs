//! Metrics Panel Widget
//!
//! Side panel with the business metrics and the service/pipeline status.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use insight_conductor::MetricsSnapshot;

use crate::theme::{DIM_GRAY, ERROR_RED, INSIGHT_TEAL, METRIC_VALUE, SUCCESS_GREEN};

/// Read-only metrics panel
pub struct MetricsPanel<'a> {
    snapshot: Option<&'a MetricsSnapshot>,
    service_online: Option<bool>,
}

impl<'a> MetricsPanel<'a> {
    pub fn new(snapshot: Option<&'a MetricsSnapshot>) -> Self {
        Self {
            snapshot,
            service_online: None,
        }
    }

    /// Show the answer service health line
    #[must_use]
    pub fn service_online(mut self, online: Option<bool>) -> Self {
        self.service_online = online;
        self
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let label = Style::default().fg(DIM_GRAY);
        let value = Style::default()
            .fg(METRIC_VALUE)
            .add_modifier(Modifier::BOLD);

        let mut lines = vec![
            Line::from(Span::styled(
                "Business Metrics",
                Style::default()
                    .fg(INSIGHT_TEAL)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::default(),
        ];

        match self.snapshot {
            Some(m) => {
                for (name, reading) in [
                    ("Churn Rate", &m.churn_rate),
                    ("High-Risk Customers", &m.high_risk_count),
                    ("Last Update", &m.last_update),
                ] {
                    lines.push(Line::from(Span::styled(name, label)));
                    lines.push(Line::from(Span::styled(reading.clone(), value)));
                    lines.push(Line::default());
                }
                if let Some(pipeline) = &m.pipeline {
                    lines.push(Line::from(Span::styled("Pipeline", label)));
                    lines.push(Line::from(Span::raw(pipeline.name.clone())));
                    lines.push(Line::from(Span::styled(
                        pipeline.status.clone(),
                        Style::default().fg(SUCCESS_GREEN),
                    )));
                    lines.push(Line::default());
                }
            }
            None => {
                lines.push(Line::from(Span::styled("Loading...", label)));
                lines.push(Line::default());
            }
        }

        let (text, color) = match self.service_online {
            Some(true) => ("● Engine online", SUCCESS_GREEN),
            Some(false) => ("● Engine offline", ERROR_RED),
            None => ("○ Checking engine...", DIM_GRAY),
        };
        lines.push(Line::from(Span::styled(text, Style::default().fg(color))));

        lines
    }
}

impl Widget for MetricsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height == 0 {
            return;
        }

        // Separator column on the left edge
        for y in area.y..area.y + area.height {
            buf.set_string(area.x, y, "│", Style::default().fg(DIM_GRAY));
        }

        let inner_x = area.x + 2;
        let inner_width = area.width.saturating_sub(2);
        for (i, line) in self.lines().iter().take(area.height as usize).enumerate() {
            buf.set_line(inner_x, area.y + i as u16, line, inner_width);
        }
    }
}
