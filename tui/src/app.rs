//! Main Application
//!
//! The App struct manages the TUI lifecycle as a thin display client:
//! - Event loop (keyboard, mouse, resize)
//! - ConductorClient for orchestration
//! - DisplayState for rendering
//!
//! The App:
//! 1. Converts terminal events to SurfaceEvents
//! 2. Sends events to the embedded Conductor via ConductorClient
//! 3. Receives ConductorMessages and updates DisplayState
//! 4. Renders based on DisplayState

use std::time::{Duration, Instant};

use crossterm::event::{
    Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
    MouseEventKind,
};
use futures::StreamExt;
use ratatui::backend::Backend;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::{Frame, Terminal};
use tokio::time::MissedTickBehavior;

use insight_conductor::{AnswerService, HttpAnswerService, SubmitOutcome};

use crate::conductor_client::ConductorClient;
use crate::display::DisplayState;
use crate::theme::{DIM_GRAY, INSIGHT_TEAL, USER_GREEN};
use crate::widgets::{MetricsPanel, Transcript, TranscriptState};

/// Input box height (lines) for text wrapping
const INPUT_HEIGHT: u16 = 4;

/// Metrics side panel width
const METRICS_WIDTH: u16 = 30;

/// Terminals narrower than this hide the metrics panel
const METRICS_MIN_TERMINAL_WIDTH: u16 = 80;

/// Lines moved per mouse wheel notch
const WHEEL_LINES: usize = 3;

/// Target ~20 FPS; enough for the thinking pulse
const FRAME_DURATION: Duration = Duration::from_millis(50);

const INPUT_PLACEHOLDER: &str = "Ask about churn, risk segments or pipelines...";

/// Main application state
pub struct App<B: AnswerService = HttpAnswerService> {
    // === Core State ===
    /// Is the app still running?
    running: bool,

    // === Conductor Integration ===
    /// Client for communicating with the embedded Conductor
    client: ConductorClient<B>,
    /// Display state derived from ConductorMessages
    display: DisplayState,

    // === Input State ===
    /// User input buffer
    input_buffer: String,
    /// Transcript scroll position
    transcript: TranscriptState,

    // === Misc State ===
    /// Last frame time (for animations)
    last_frame: Instant,
}

impl<B: AnswerService + 'static> App<B> {
    /// Create a new App around a Conductor client
    pub fn new(client: ConductorClient<B>) -> Self {
        Self {
            running: true,
            client,
            display: DisplayState::new(),
            input_buffer: String::new(),
            transcript: TranscriptState::default(),
            last_frame: Instant::now(),
        }
    }

    /// Main event loop
    pub async fn run<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        // Create async event stream for non-blocking terminal events
        let mut event_stream = EventStream::new();
        let mut frame_ticker = tokio::time::interval(FRAME_DURATION);
        frame_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        // The health check finishes in the background; tick picks it up
        self.connect().await;
        self.draw(terminal)?;
        self.start().await;

        while self.running {
            tokio::select! {
                biased;

                // Check for terminal events - highest priority
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event).await,
                        Some(Err(e)) => tracing::warn!("Terminal event error: {}", e),
                        None => self.running = false,
                    }
                }

                // Frame tick
                _ = frame_ticker.tick() => {}
            }

            self.tick().await;
            self.draw(terminal)?;
        }

        Ok(())
    }

    /// Connect to the Conductor and apply the initial snapshot
    pub async fn connect(&mut self) {
        if let Err(e) = self.client.connect().await {
            tracing::warn!("Conductor connect error: {}", e);
        }
        self.process_conductor_messages();
    }

    /// Become ready for input and launch the health check
    pub async fn start(&mut self) {
        if let Err(e) = self.client.start().await {
            tracing::warn!("Conductor start error: {}", e);
        }
        self.process_conductor_messages();
    }

    /// One frame of non-input work
    ///
    /// Resolves a finished answer call or health check, applies Conductor
    /// messages and advances animations.
    pub async fn tick(&mut self) {
        self.client.poll_health().await;
        self.client.poll_response().await;
        self.process_conductor_messages();

        let now = Instant::now();
        self.display.update(now - self.last_frame);
        self.last_frame = now;

        if self.display.should_quit() {
            self.running = false;
        }
    }

    /// Dispatch a terminal event
    pub async fn handle_event(&mut self, event: Event) {
        match event {
            // Only handle Press events (not Release or Repeat)
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key(key).await,
            Event::Mouse(mouse) => self.handle_mouse(mouse),
            // Resize is picked up by the next draw
            _ => {}
        }
    }

    /// Process all pending messages from the Conductor
    fn process_conductor_messages(&mut self) {
        for msg in self.client.recv_all() {
            self.display.apply_message(msg);
        }
        if let Some(text) = self.display.take_pending_input() {
            self.input_buffer = text;
        }
    }

    /// Handle keyboard input
    pub async fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            // Quit
            KeyCode::Esc => self.quit().await,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.quit().await;
            }

            // Submit message
            KeyCode::Enter => {
                let content = self.input_buffer.clone();
                match self.client.submit(&content).await {
                    SubmitOutcome::Accepted => {
                        self.input_buffer.clear();
                        self.transcript.scroll_to_bottom();
                    }
                    SubmitOutcome::Ignored => {}
                    SubmitOutcome::Rejected => {
                        tracing::debug!("Submit while an answer is pending");
                    }
                }
            }

            // Conversation scrolling
            KeyCode::PageUp => {
                let page = self.transcript.page_size();
                self.transcript.scroll_up(page);
            }
            KeyCode::PageDown => {
                let page = self.transcript.page_size();
                self.transcript.scroll_down(page);
            }
            KeyCode::Home if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.transcript.scroll_up(usize::MAX);
            }
            KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.transcript.scroll_to_bottom();
            }

            // Typing
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input_buffer.push(c);
                self.sync_input().await;
            }
            KeyCode::Backspace => {
                if self.input_buffer.pop().is_some() {
                    self.sync_input().await;
                }
            }

            _ => {}
        }
    }

    /// Handle mouse input
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        match mouse.kind {
            MouseEventKind::ScrollUp => self.transcript.scroll_up(WHEEL_LINES),
            MouseEventKind::ScrollDown => self.transcript.scroll_down(WHEEL_LINES),
            _ => {}
        }
    }

    async fn sync_input(&mut self) {
        if let Err(e) = self.client.input_changed(self.input_buffer.clone()).await {
            tracing::warn!("Failed to send input to conductor: {}", e);
        }
    }

    async fn quit(&mut self) {
        if let Err(e) = self.client.request_quit().await {
            tracing::warn!("Conductor shutdown error: {}", e);
        }
        self.process_conductor_messages();
        self.running = false;
    }

    /// Render one frame
    pub fn draw<T: Backend>(&mut self, terminal: &mut Terminal<T>) -> anyhow::Result<()> {
        terminal.draw(|frame| self.render(frame))?;
        Ok(())
    }

    fn render(&mut self, frame: &mut Frame<'_>) {
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(INPUT_HEIGHT),
                Constraint::Length(1),
            ])
            .split(frame.area());

        let (conversation_area, metrics_area) = if rows[0].width >= METRICS_MIN_TERMINAL_WIDTH {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Min(20), Constraint::Length(METRICS_WIDTH)])
                .split(rows[0]);
            (cols[0], Some(cols[1]))
        } else {
            (rows[0], None)
        };

        self.render_conversation(frame, conversation_area);
        if let Some(area) = metrics_area {
            frame.render_widget(
                MetricsPanel::new(self.display.metrics.as_ref())
                    .service_online(self.display.service_online),
                area,
            );
        }
        self.render_input(frame, rows[1]);
        self.render_status(frame, rows[2]);
    }

    /// Render conversation area
    fn render_conversation(&mut self, frame: &mut Frame<'_>, area: Rect) {
        // One column of margin on each side
        let inner = Rect {
            x: area.x + 1,
            width: area.width.saturating_sub(2),
            ..area
        };

        let mut transcript = Transcript::new(&self.display.messages);
        if self.display.is_busy() {
            transcript = transcript.thinking(self.display.pulse_on());
        }
        frame.render_stateful_widget(transcript, inner, &mut self.transcript);
    }

    /// Render input area
    fn render_input(&self, frame: &mut Frame<'_>, area: Rect) {
        let buf = frame.buffer_mut();

        let separator = "─".repeat(area.width as usize);
        buf.set_string(area.x, area.y, &separator, Style::default().fg(DIM_GRAY));

        let text_height = area.height.saturating_sub(1) as usize;
        let text_width = area.width.saturating_sub(2) as usize;
        if text_width < 5 || text_height < 1 {
            return;
        }

        if self.input_buffer.is_empty() {
            buf.set_string(
                area.x + 1,
                area.y + 1,
                format!("> {INPUT_PLACEHOLDER}"),
                Style::default().fg(DIM_GRAY).add_modifier(Modifier::ITALIC),
            );
            return;
        }

        let full_input = format!("> {}_", self.input_buffer);
        let wrapped_lines: Vec<String> = textwrap::wrap(&full_input, text_width)
            .iter()
            .map(|s| s.to_string())
            .collect();

        // Keep the cursor line visible
        let skip = wrapped_lines.len().saturating_sub(text_height);
        for (i, line) in wrapped_lines.iter().skip(skip).enumerate() {
            let y = area.y + 1 + i as u16;
            buf.set_string(area.x + 1, y, line, Style::default().fg(USER_GREEN));
        }

        if skip > 0 {
            buf.set_string(
                area.x + area.width.saturating_sub(3),
                area.y,
                "^",
                Style::default().fg(INSIGHT_TEAL),
            );
        }
    }

    /// Render status bar
    fn render_status(&self, frame: &mut Frame<'_>, area: Rect) {
        let state_str = self.display.conductor_state.description();

        let status_style = if self.display.is_busy() {
            Style::default().fg(INSIGHT_TEAL)
        } else {
            Style::default().fg(DIM_GRAY)
        };

        let scroll_info = if self.transcript.is_following() {
            String::new()
        } else {
            format!(
                " [^{} lines - Ctrl+End to follow]",
                self.transcript.offset()
            )
        };

        let status = format!(
            " {state_str} | Enter send | Esc quit | PgUp/PgDn scroll{scroll_info}"
        );

        frame
            .buffer_mut()
            .set_stringn(area.x, area.y, &status, area.width as usize, status_style);
    }

    /// Whether the event loop is still running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Current display state
    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    /// Current input box contents
    pub fn input(&self) -> &str {
        &self.input_buffer
    }

    /// Transcript scroll state
    pub fn transcript(&self) -> &TranscriptState {
        &self.transcript
    }

    /// Wait for a pending answer and apply it (headless use)
    pub async fn wait_for_response(&mut self) {
        self.client.wait_for_response().await;
        self.process_conductor_messages();
    }

    /// Wait for the health check and apply its result
    pub async fn wait_for_health(&mut self) {
        self.client.wait_for_health().await;
        self.process_conductor_messages();
    }

    /// Get the goodbye message for display after TUI closes
    pub fn goodbye(&self) -> Option<&str> {
        self.display.goodbye.as_deref()
    }
}
