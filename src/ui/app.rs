//! Dashboard application state: key handling and frame layout.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use tracing::error;

use super::chart::render_chart;
use super::crossterm_engine::Spinner;
use super::overlays::{Overlay, SettingsOverlay};
use crate::settings::{SettingsAction, SettingsDraft};
use crate::state::{FetchOutcome, PendingRequest, ViewState};

pub struct DashboardApp {
    pub state: ViewState,
    settings: Option<SettingsDraft>,
    cursor: Option<usize>,
    spinner: Spinner,
    quit: bool,
}

impl DashboardApp {
    pub fn new(state: ViewState) -> Self {
        Self {
            state,
            settings: None,
            cursor: None,
            spinner: Spinner::new(),
            quit: false,
        }
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn settings_open(&self) -> bool {
        self.settings.is_some()
    }

    /// Index of the date under the tooltip cursor.
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Submit the current input, e.g. on mount.
    pub fn submit(&mut self) -> Option<PendingRequest> {
        self.state.begin_submit()
    }

    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        self.state.apply_outcome(outcome);
        self.reset_cursor();
    }

    /// Put the cursor on the latest date of the current chart.
    fn reset_cursor(&mut self) {
        self.cursor = self
            .state
            .chart()
            .and_then(|chart| chart.labels.len().checked_sub(1));
    }

    /// Handle one key press. Returns a request when the key submitted the form.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<PendingRequest> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit = true;
            return None;
        }

        if self.settings.is_some() {
            self.handle_settings_key(key);
            return None;
        }

        match key.code {
            KeyCode::Esc => self.quit = true,
            KeyCode::Enter => return self.submit(),
            KeyCode::F(2) => self.open_settings(),
            KeyCode::Left => self.move_cursor(-1),
            KeyCode::Right => self.move_cursor(1),
            KeyCode::Backspace => {
                let mut text = self.state.symbol_input.clone();
                text.pop();
                self.state.set_symbol_input(&text);
            }
            KeyCode::Char(c)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                let mut text = self.state.symbol_input.clone();
                text.push(c);
                self.state.set_symbol_input(&text);
            }
            _ => {}
        }
        None
    }

    fn open_settings(&mut self) {
        let (income, balance) = self.state.metric_keys();
        self.settings = Some(SettingsDraft::open(&self.state.options, &income, &balance));
    }

    fn handle_settings_key(&mut self, key: KeyEvent) {
        let Some(draft) = self.settings.as_mut() else {
            return;
        };

        let action = match key.code {
            KeyCode::Up => {
                draft.move_up();
                SettingsAction::None
            }
            KeyCode::Down => {
                draft.move_down();
                SettingsAction::None
            }
            KeyCode::Char(' ') | KeyCode::Enter => draft.activate(),
            KeyCode::Char('r') => draft.reset(),
            KeyCode::Esc => draft.close(),
            _ => SettingsAction::None,
        };

        match action {
            SettingsAction::None => {}
            SettingsAction::Save(options) => {
                self.settings = None;
                self.state.apply_options(options);
                self.reset_cursor();
            }
            SettingsAction::Close => self.settings = None,
        }
    }

    fn move_cursor(&mut self, delta: isize) {
        let Some(len) = self.state.chart().map(|c| c.labels.len()).filter(|n| *n > 0) else {
            return;
        };
        let current = self.cursor.unwrap_or(len - 1) as isize;
        self.cursor = Some((current + delta).clamp(0, len as isize - 1) as usize);
    }

    /// Tooltip text for the cursor position: title then one line per metric.
    pub fn tooltip(&self) -> Vec<String> {
        let (Some(chart), Some(idx)) = (self.state.chart(), self.cursor) else {
            return Vec::new();
        };
        chart
            .tooltip_title(idx)
            .into_iter()
            .chain(chart.tooltip_lines(idx))
            .collect()
    }

    pub fn draw(&self, f: &mut Frame) {
        let area = f.area();
        let tooltip = self.tooltip();
        let tooltip_height = (tooltip.len() as u16 + 2).max(3);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(tooltip_height),
                Constraint::Length(1),
            ])
            .split(area);

        let title = Paragraph::new(Line::from(Span::styled(
            self.state.title(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
        f.render_widget(title, chunks[0]);

        let input = Paragraph::new(self.state.symbol_input.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Stock Symbol "),
        );
        f.render_widget(input, chunks[1]);

        f.render_widget(self.status_line(), chunks[2]);
        self.draw_chart(f, chunks[3]);

        let tooltip_widget = Paragraph::new(tooltip.join("\n"))
            .block(Block::default().borders(Borders::ALL).title(" Details "));
        f.render_widget(tooltip_widget, chunks[4]);

        let footer = Paragraph::new(
            "  Enter fetch · F2 settings · ←/→ move cursor · Esc quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        f.render_widget(footer, chunks[5]);

        if let Some(draft) = &self.settings {
            SettingsOverlay::new(draft).render(f, area);
        }
    }

    fn status_line(&self) -> Paragraph<'static> {
        if self.state.loading {
            Paragraph::new(format!("{} Loading...", self.spinner.tick()))
                .style(Style::default().fg(Color::Cyan))
        } else if let Some(message) = &self.state.error {
            Paragraph::new(message.clone()).style(Style::default().fg(Color::Red))
        } else {
            Paragraph::new("")
        }
    }

    fn draw_chart(&self, f: &mut Frame, area: Rect) {
        let Some(chart) = self.state.chart() else {
            return;
        };
        if let Err(e) = render_chart(f, area, chart, self.cursor) {
            error!("Skipping chart render: {}", e);
        }
    }
}
