//! Transcript Widget
//!
//! A borderless, scrollable view of the conversation. Message text goes
//! through the formatter on every render, so headings, list items and
//! paragraphs are styled without being stored anywhere.
//!
//! Scrolling is counted in lines from the bottom. While the user has not
//! scrolled away, the view follows the newest content; once they scroll up
//! it holds position until they come back down or re-anchor.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::StatefulWidget;
use unicode_width::UnicodeWidthStr;

use insight_conductor::{format_text, group_blocks, BlockGroup, DisplayBlock};

use crate::display::{DisplayMessage, DisplayRole};
use crate::theme::{
    body_style, heading_style, role_style, BULLET_AMBER, DIM_GRAY, THINKING_BRIGHT, THINKING_DIM,
};

/// Shown after the last message while an answer is pending
pub const THINKING_TEXT: &str = "Reasoning across data sources...";

const BULLET: &str = "  • ";
const BULLET_CONT: &str = "    ";

/// Scroll state for the transcript
#[derive(Debug)]
pub struct TranscriptState {
    /// Lines scrolled up from the bottom (0 = newest content visible)
    offset: usize,
    /// Total rendered lines at the last render
    total_lines: usize,
    /// Visible height at the last render
    viewport: usize,
    /// Whether new content should pull the view down
    follow: bool,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self {
            offset: 0,
            total_lines: 0,
            viewport: 0,
            follow: true,
        }
    }
}

impl TranscriptState {
    /// Scroll towards older content
    pub fn scroll_up(&mut self, lines: usize) {
        if lines == 0 {
            return;
        }
        let max_offset = self.total_lines.saturating_sub(self.viewport);
        self.offset = self.offset.saturating_add(lines).min(max_offset);
        self.follow = self.offset == 0;
    }

    /// Scroll towards newer content; reaching the bottom resumes following
    pub fn scroll_down(&mut self, lines: usize) {
        self.offset = self.offset.saturating_sub(lines);
        if self.offset == 0 {
            self.follow = true;
        }
    }

    /// Jump to the newest content and follow it
    pub fn scroll_to_bottom(&mut self) {
        self.offset = 0;
        self.follow = true;
    }

    /// Half the visible height, at least one line
    pub fn page_size(&self) -> usize {
        (self.viewport / 2).max(1)
    }

    /// Lines scrolled up from the bottom
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Whether the view is pinned to the newest content
    pub fn is_following(&self) -> bool {
        self.follow
    }

    /// Total lines at the last render
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    /// Reconcile with freshly laid out content
    fn sync(&mut self, total_lines: usize, viewport: usize) {
        if self.follow {
            self.offset = 0;
        } else if total_lines > self.total_lines {
            // Hold position: content grew below the viewport
            self.offset += total_lines - self.total_lines;
        }

        self.total_lines = total_lines;
        self.viewport = viewport;

        let max_offset = total_lines.saturating_sub(viewport);
        self.offset = self.offset.min(max_offset);
        if self.offset == 0 {
            self.follow = true;
        }
    }
}

/// The conversation, laid out for the terminal
pub struct Transcript<'a> {
    messages: &'a [DisplayMessage],
    /// `Some(bright)` while waiting for an answer
    thinking: Option<bool>,
}

impl<'a> Transcript<'a> {
    pub fn new(messages: &'a [DisplayMessage]) -> Self {
        Self {
            messages,
            thinking: None,
        }
    }

    /// Show the thinking indicator in the given pulse phase
    #[must_use]
    pub fn thinking(mut self, bright: bool) -> Self {
        self.thinking = Some(bright);
        self
    }
}

impl StatefulWidget for Transcript<'_> {
    type State = TranscriptState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        // Leave the last column for scroll hints
        let text_width = area.width.saturating_sub(1) as usize;
        let lines = transcript_lines(self.messages, self.thinking, text_width);
        let height = area.height as usize;

        state.sync(lines.len(), height);

        let visible_end = lines.len().saturating_sub(state.offset);
        let visible_start = visible_end.saturating_sub(height);

        for (i, line) in lines[visible_start..visible_end].iter().enumerate() {
            let y = area.y + i as u16;
            buf.set_line(area.x, y, line, text_width as u16);
        }

        let hint_x = area.x + area.width - 1;
        let hint_style = Style::default().fg(DIM_GRAY);
        if visible_start > 0 {
            buf.set_string(hint_x, area.y, "▲", hint_style);
        }
        if state.offset > 0 {
            buf.set_string(hint_x, area.y + area.height - 1, "▼", hint_style);
        }
    }
}

/// Lay out messages (and the thinking indicator) as styled lines
///
/// `thinking` is `Some(bright)` while an answer is pending; the indicator
/// goes after the last message.
pub fn transcript_lines(
    messages: &[DisplayMessage],
    thinking: Option<bool>,
    width: usize,
) -> Vec<Line<'static>> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for message in messages {
        lines.push(Line::from(Span::styled(
            message.role.label(),
            role_style(message.role),
        )));
        push_message_body(&mut lines, message, width);
        lines.push(Line::default());
    }

    if let Some(bright) = thinking {
        let color = if bright { THINKING_BRIGHT } else { THINKING_DIM };
        lines.push(Line::from(Span::styled(
            DisplayRole::Ai.label(),
            role_style(DisplayRole::Ai),
        )));
        for chunk in textwrap::wrap(THINKING_TEXT, width) {
            lines.push(Line::from(Span::styled(
                chunk.into_owned(),
                Style::default().fg(color).add_modifier(Modifier::ITALIC),
            )));
        }
    }

    lines
}

fn push_message_body(lines: &mut Vec<Line<'static>>, message: &DisplayMessage, width: usize) {
    let body = body_style(message.role);
    let blocks = format_text(&message.content);

    for group in group_blocks(&blocks) {
        match group {
            BlockGroup::Single(DisplayBlock::Heading(text)) => {
                push_wrapped(lines, &text, width, heading_style());
            }
            BlockGroup::Single(DisplayBlock::Paragraph(text)) => {
                if text.is_empty() {
                    lines.push(Line::default());
                } else {
                    push_wrapped(lines, &text, width, body);
                }
            }
            BlockGroup::Single(DisplayBlock::ListItem(item)) => {
                push_list_item(lines, &item, width, body);
            }
            BlockGroup::List(items) => {
                for item in &items {
                    push_list_item(lines, item, width, body);
                }
            }
        }
    }
}

fn push_wrapped(lines: &mut Vec<Line<'static>>, text: &str, width: usize, style: Style) {
    for chunk in textwrap::wrap(text, width) {
        lines.push(Line::from(Span::styled(chunk.into_owned(), style)));
    }
}

fn push_list_item(lines: &mut Vec<Line<'static>>, item: &str, width: usize, style: Style) {
    let item_width = width.saturating_sub(BULLET.width()).max(1);
    let wrapped = textwrap::wrap(item, item_width);

    if wrapped.is_empty() {
        lines.push(Line::from(Span::styled(
            BULLET,
            Style::default().fg(BULLET_AMBER),
        )));
        return;
    }

    for (i, chunk) in wrapped.into_iter().enumerate() {
        let lead = if i == 0 {
            Span::styled(BULLET, Style::default().fg(BULLET_AMBER))
        } else {
            Span::raw(BULLET_CONT)
        };
        lines.push(Line::from(vec![
            lead,
            Span::styled(chunk.into_owned(), style),
        ]));
    }
}

/// Plain-text rendering of one message, for non-terminal output
pub fn plain_lines(text: &str) -> Vec<String> {
    let mut out = Vec::new();

    for block in format_text(text) {
        match block {
            DisplayBlock::Heading(title) => {
                let rule = "─".repeat(title.width().max(1));
                out.push(title);
                out.push(rule);
            }
            DisplayBlock::ListItem(item) => out.push(format!("{BULLET}{item}")),
            DisplayBlock::Paragraph(para) => out.push(para),
        }
    }

    out
}
