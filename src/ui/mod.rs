// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal UI for chordchart.
//!
//! Provides a ratatui-based viewer with a lyrics panel, the per-section
//! chord map and a status bar. The app owns one job view at a time.

mod chart;
mod lyrics;

pub use chart::{chart_lines, ChartWidget};
pub use lyrics::{lyric_lines, LyricsWidget};

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::config::ChartConfig;
use crate::model::{ChartSettings, ViewMode};
use crate::view::JobView;

/// Viewer state
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Current job view, if one has loaded
    pub view: Option<JobView>,
    /// Which panels are shown
    pub mode: ViewMode,
    /// Vertical scroll offset of the content panels
    pub scroll: u16,
    /// Help text visible
    pub show_help: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
    /// Job id of an in-flight load
    pub loading: Option<String>,
    /// Position of the current job in the job list
    pub job_index: usize,
    /// Number of jobs given on the command line
    pub job_count: usize,
}

impl UiState {
    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    /// Clear expired status message
    pub fn clear_expired_status(&mut self) {
        if let Some(time) = self.status_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_time = None;
            }
        }
    }

    /// Replace the job view; the previous one is dropped
    pub fn set_view(&mut self, view: JobView) {
        self.view = Some(view);
        self.loading = None;
        self.scroll = 0;
    }

    /// Settings of the current view
    pub fn settings(&self) -> Option<ChartSettings> {
        self.view.as_ref().map(JobView::settings)
    }

    /// Re-derive the current view with new settings
    pub fn apply_settings(&mut self, settings: ChartSettings) {
        if let Some(view) = self.view.as_mut() {
            if view.apply_settings(settings) {
                self.set_status(format!(
                    "Chords: {} / {}",
                    settings.simplification, settings.style
                ));
            }
        }
    }

    /// Take view mode and chord settings from a reloaded config
    pub fn apply_config(&mut self, chart: &ChartConfig) {
        if self.mode != chart.view {
            self.mode = chart.view;
            self.set_status(format!("View: {}", chart.view));
        }
        self.apply_settings(chart.settings());
    }

    /// Job index an action asks to load, if any.
    ///
    /// With no view on screen (a cancelled load) `n`/`p` retry the current job.
    pub fn load_target(&self, action: &KeyAction) -> Option<usize> {
        if self.job_count == 0 {
            return None;
        }
        match action {
            KeyAction::NextJob if self.job_index + 1 < self.job_count => Some(self.job_index + 1),
            KeyAction::PrevJob if self.job_index > 0 => Some(self.job_index - 1),
            KeyAction::NextJob | KeyAction::PrevJob if self.view.is_none() => Some(self.job_index),
            KeyAction::Reload => Some(self.job_index),
            _ => None,
        }
    }

    /// Update state for an action; job navigation and quitting are left to the caller
    pub fn apply(&mut self, action: &KeyAction) {
        match action {
            KeyAction::SetView(mode) => {
                self.mode = *mode;
                self.set_status(format!("View: {}", mode));
            }
            KeyAction::CycleSimplification => {
                if let Some(mut settings) = self.settings() {
                    settings.simplification = settings.simplification.next();
                    self.apply_settings(settings);
                }
            }
            KeyAction::ToggleStyle => {
                if let Some(mut settings) = self.settings() {
                    settings.style = settings.style.toggle();
                    self.apply_settings(settings);
                }
            }
            KeyAction::ScrollUp => self.scroll = self.scroll.saturating_sub(1),
            KeyAction::ScrollDown => self.scroll = self.scroll.saturating_add(1),
            KeyAction::ToggleHelp => self.show_help = !self.show_help,
            KeyAction::None
            | KeyAction::Quit
            | KeyAction::NextJob
            | KeyAction::PrevJob
            | KeyAction::Reload
            | KeyAction::CancelLoad => {}
        }
    }
}

/// Key event result
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Quit the application
    Quit,
    /// Switch panels
    SetView(ViewMode),
    /// Next chord simplification level
    CycleSimplification,
    /// Toggle pop/jazz chord names
    ToggleStyle,
    /// Scroll content up
    ScrollUp,
    /// Scroll content down
    ScrollDown,
    /// Load the next job
    NextJob,
    /// Load the previous job
    PrevJob,
    /// Load the current job again
    Reload,
    /// Toggle help
    ToggleHelp,
    /// Abort an in-flight load
    CancelLoad,
}

/// Map a key press to an action
pub fn key_action(code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    match (code, modifiers) {
        // Quit
        (KeyCode::Char('q'), KeyModifiers::NONE)
        | (KeyCode::Char('c'), KeyModifiers::CONTROL) => KeyAction::Quit,

        // View mode
        (KeyCode::Char('b'), KeyModifiers::NONE) => KeyAction::SetView(ViewMode::Both),
        (KeyCode::Char('l'), KeyModifiers::NONE) => KeyAction::SetView(ViewMode::Lyrics),
        (KeyCode::Char('c'), KeyModifiers::NONE) => KeyAction::SetView(ViewMode::Chords),

        // Chord labels
        (KeyCode::Char('s'), KeyModifiers::NONE) => KeyAction::CycleSimplification,
        (KeyCode::Char('j'), KeyModifiers::NONE) => KeyAction::ToggleStyle,

        // Scrolling
        (KeyCode::Up, _) => KeyAction::ScrollUp,
        (KeyCode::Down, _) => KeyAction::ScrollDown,

        // Jobs
        (KeyCode::Char('n'), KeyModifiers::NONE) => KeyAction::NextJob,
        (KeyCode::Char('p'), KeyModifiers::NONE) => KeyAction::PrevJob,
        (KeyCode::Char('r'), KeyModifiers::NONE) => KeyAction::Reload,
        (KeyCode::Esc, _) => KeyAction::CancelLoad,

        // Help
        (KeyCode::Char('?'), _) | (KeyCode::Char('h'), KeyModifiers::NONE) => KeyAction::ToggleHelp,

        _ => KeyAction::None,
    }
}

/// Terminal UI application
pub struct App {
    /// UI state
    state: UiState,
    /// Terminal handle
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Target frame rate
    frame_rate: u32,
    /// Whether to continue running
    running: bool,
}

impl App {
    /// Create a new app, taking over the terminal
    pub fn new(state: UiState) -> io::Result<Self> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            state,
            terminal,
            frame_rate: 30,
            running: true,
        })
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut UiState {
        &mut self.state
    }

    /// Check if running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the app
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Handle a key event
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        let action = key_action(code, modifiers);
        if action == KeyAction::Quit {
            self.quit();
        }
        self.state.apply(&action);
        action
    }

    /// Poll for events with timeout
    pub fn poll_event(&self) -> io::Result<Option<Event>> {
        let timeout = Duration::from_millis(1000 / self.frame_rate as u64);
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Drain pending key presses during a load; true when one asks to abort
    pub fn poll_abort(&mut self) -> io::Result<bool> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match key_action(key.code, key.modifiers) {
                    KeyAction::CancelLoad => return Ok(true),
                    KeyAction::Quit => {
                        self.quit();
                        return Ok(true);
                    }
                    _ => {}
                }
            }
        }
        Ok(false)
    }

    /// Draw the UI
    pub fn draw(&mut self) -> io::Result<()> {
        let state = &self.state;

        self.terminal.draw(|frame| {
            let area = frame.area();

            // Main layout: header, content, footer
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(3), // Header
                    Constraint::Min(5),    // Lyrics / chord map
                    Constraint::Length(1), // Status bar
                ])
                .split(area);

            render_header(frame, chunks[0], state);
            render_content(frame, chunks[1], state);
            render_status_bar(frame, chunks[2], state);

            // Help overlay
            if state.show_help {
                render_help_overlay(frame, area);
            }
        })?;

        Ok(())
    }

    /// Cleanup terminal on drop
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Render song title and chord settings
fn render_header(frame: &mut Frame, area: Rect, state: &UiState) {
    let block = Block::default().borders(Borders::ALL).title(" chordchart ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let title = state
        .view
        .as_ref()
        .map(|view| view.title().to_string())
        .or_else(|| state.loading.clone())
        .unwrap_or_default();

    let mut spans = vec![
        Span::styled("Song: ", Style::default().fg(Color::DarkGray)),
        Span::styled(title, Style::default().fg(Color::White).add_modifier(Modifier::BOLD)),
    ];

    if let Some(settings) = state.settings() {
        spans.push(Span::styled(
            format!("  {} / {}", settings.simplification, settings.style),
            Style::default().fg(Color::Magenta),
        ));
    }
    spans.push(Span::styled(
        format!("  [{}]", state.mode),
        Style::default().fg(Color::Cyan),
    ));
    if state.job_count > 1 {
        spans.push(Span::styled(
            format!("  job {}/{}", state.job_index + 1, state.job_count),
            Style::default().fg(Color::DarkGray),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), inner);
}

/// Render lyrics and chord map panels for the current mode
fn render_content(frame: &mut Frame, area: Rect, state: &UiState) {
    let Some(view) = state.view.as_ref() else {
        let text = match &state.loading {
            Some(job_id) => format!("Loading {}... (Esc to cancel)", job_id),
            None => "No job loaded (r to retry)".to_string(),
        };
        let widget = Paragraph::new(text)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(widget, area);
        return;
    };

    let lyrics = || {
        LyricsWidget::new(view.lyrics())
            .show_chords(state.mode.shows_lyric_chords())
            .scroll(state.scroll)
            .block(Block::default().borders(Borders::ALL).title(" Lyrics "))
    };
    let chart = || {
        ChartWidget::new(&view.chart().sections)
            .scroll(state.scroll)
            .block(Block::default().borders(Borders::ALL).title(" Chord Map "))
    };

    match state.mode {
        ViewMode::Both => {
            let chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(area);
            frame.render_widget(lyrics(), chunks[0]);
            frame.render_widget(chart(), chunks[1]);
        }
        ViewMode::Lyrics => frame.render_widget(lyrics(), area),
        ViewMode::Chords => frame.render_widget(chart(), area),
    }
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, area: Rect, state: &UiState) {
    let text = if let Some(ref msg) = state.status_message {
        Span::styled(msg, Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            " b/l/c: View | s: Simplify | j: Pop/Jazz | n/p: Job | r: Reload | h: Help | q: Quit",
            Style::default().fg(Color::DarkGray),
        )
    };

    frame.render_widget(Paragraph::new(text), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect) {
    // Calculate centered area
    let width = 46.min(area.width.saturating_sub(4));
    let height = 18.min(area.height.saturating_sub(4));
    let x = (area.width - width) / 2;
    let y = (area.height - height) / 2;
    let help_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let help_text = vec![
        Line::from(Span::styled("View", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  b           Lyrics and chord map"),
        Line::from("  l           Lyrics only"),
        Line::from("  c           Chord map only"),
        Line::from("  Up/Down     Scroll"),
        Line::from(""),
        Line::from(Span::styled("Chords", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  s           Cycle basic/simple/complex"),
        Line::from("  j           Toggle pop/jazz names"),
        Line::from(""),
        Line::from(Span::styled("Jobs", Style::default().add_modifier(Modifier::BOLD))),
        Line::from("  n/p         Next/previous job"),
        Line::from("  r           Reload current job"),
        Line::from("  Esc         Cancel loading"),
        Line::from("  h/?         Toggle help"),
        Line::from("  q/Ctrl+c    Quit"),
    ];

    frame.render_widget(Paragraph::new(help_text), inner);
}
