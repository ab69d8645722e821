//! Overlay widgets drawn on top of the dashboard.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};
use ratatui::Frame;

use crate::settings::{SettingsDraft, SettingsItem};

/// Anything drawn as a modal over the dashboard.
pub trait Overlay {
    fn render(&self, f: &mut Frame, area: Rect);
}

/// The settings modal.
pub struct SettingsOverlay<'a> {
    draft: &'a SettingsDraft,
}

impl<'a> SettingsOverlay<'a> {
    pub fn new(draft: &'a SettingsDraft) -> Self {
        Self { draft }
    }

    /// Plain text of every row, headings unindented.
    pub fn lines(&self) -> Vec<String> {
        self.draft
            .items()
            .iter()
            .map(|item| match item {
                SettingsItem::Heading(_) => self.draft.item_text(item),
                _ => format!("  {}", self.draft.item_text(item)),
            })
            .collect()
    }
}

impl Overlay for SettingsOverlay<'_> {
    fn render(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(60, 80, area);

        let items: Vec<ListItem> = self
            .draft
            .items()
            .iter()
            .zip(self.lines())
            .map(|(item, text)| {
                let style = match item {
                    SettingsItem::Heading(_) => Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                    SettingsItem::Save | SettingsItem::Reset => Style::default().fg(Color::Cyan),
                    _ => Style::default(),
                };
                ListItem::new(text).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(" Settings ")
                    .title_bottom(" Space toggle · Enter select · r reset · Esc close "),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

        let mut state = ListState::default().with_selected(Some(self.draft.cursor()));
        f.render_widget(Clear, popup);
        f.render_stateful_widget(list, popup, &mut state);
    }
}

/// A rect of `percent_x` by `percent_y` centred in `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
