//! Settings panel model.
//!
//! The panel edits a draft copy of the display options. Saving hands the
//! draft back to the caller; closing discards it; resetting returns the
//! defaults.

use crate::options::{Cadence, DisplayOptions, Scale};
use crate::utils::humanize_key;

/// One row of the settings panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsItem {
    Heading(&'static str),
    Metric(String),
    Scale(Scale),
    Cadence(Cadence),
    Save,
    Reset,
}

impl SettingsItem {
    pub fn is_selectable(&self) -> bool {
        !matches!(self, SettingsItem::Heading(_))
    }
}

/// What the panel asks its owner to do after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsAction {
    None,
    Save(DisplayOptions),
    Close,
}

#[derive(Debug, Clone)]
pub struct SettingsDraft {
    draft: DisplayOptions,
    items: Vec<SettingsItem>,
    cursor: usize,
}

impl SettingsDraft {
    pub fn open(current: &DisplayOptions, income_keys: &[String], balance_keys: &[String]) -> Self {
        let mut items = vec![SettingsItem::Heading("Income Statement Options")];
        items.extend(income_keys.iter().cloned().map(SettingsItem::Metric));
        items.push(SettingsItem::Heading("Balance Sheet Options"));
        items.extend(balance_keys.iter().cloned().map(SettingsItem::Metric));
        items.push(SettingsItem::Heading("Scale Options"));
        items.extend(Scale::ALL.into_iter().map(SettingsItem::Scale));
        items.push(SettingsItem::Heading("Quarterly vs Annual"));
        items.extend(Cadence::ALL.into_iter().map(SettingsItem::Cadence));
        items.push(SettingsItem::Save);
        items.push(SettingsItem::Reset);

        let cursor = items
            .iter()
            .position(SettingsItem::is_selectable)
            .unwrap_or(0);

        Self {
            draft: current.clone(),
            items,
            cursor,
        }
    }

    pub fn items(&self) -> &[SettingsItem] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn draft(&self) -> &DisplayOptions {
        &self.draft
    }

    /// Display text for a row, including its checkbox or radio marker.
    pub fn item_text(&self, item: &SettingsItem) -> String {
        match item {
            SettingsItem::Heading(title) => title.to_string(),
            SettingsItem::Metric(key) => format!(
                "[{}] {}",
                if self.draft.is_selected(key) { "x" } else { " " },
                humanize_key(key)
            ),
            SettingsItem::Scale(scale) => format!(
                "({}) {}",
                if self.draft.scale == *scale { "*" } else { " " },
                scale.label()
            ),
            SettingsItem::Cadence(cadence) => format!(
                "({}) {}",
                if self.draft.cadence == *cadence { "*" } else { " " },
                cadence.label()
            ),
            SettingsItem::Save => "Save settings".to_string(),
            SettingsItem::Reset => "Reset to Default".to_string(),
        }
    }

    pub fn move_down(&mut self) {
        if let Some(next) = (self.cursor + 1..self.items.len()).find(|&i| self.items[i].is_selectable()) {
            self.cursor = next;
        }
    }

    pub fn move_up(&mut self) {
        if let Some(prev) = (0..self.cursor).rev().find(|&i| self.items[i].is_selectable()) {
            self.cursor = prev;
        }
    }

    pub fn toggle_metric(&mut self, metric: &str) {
        let on = self.draft.is_selected(metric);
        self.draft.set_selected(metric, !on);
    }

    pub fn set_scale(&mut self, scale: Scale) {
        self.draft.scale = scale;
    }

    pub fn set_cadence(&mut self, cadence: Cadence) {
        self.draft.cadence = cadence;
    }

    /// Activate the row under the cursor (Space / Enter).
    pub fn activate(&mut self) -> SettingsAction {
        match self.items.get(self.cursor).cloned() {
            Some(SettingsItem::Metric(key)) => {
                self.toggle_metric(&key);
                SettingsAction::None
            }
            Some(SettingsItem::Scale(scale)) => {
                self.set_scale(scale);
                SettingsAction::None
            }
            Some(SettingsItem::Cadence(cadence)) => {
                self.set_cadence(cadence);
                SettingsAction::None
            }
            Some(SettingsItem::Save) => self.save(),
            Some(SettingsItem::Reset) => self.reset(),
            Some(SettingsItem::Heading(_)) | None => SettingsAction::None,
        }
    }

    pub fn save(&self) -> SettingsAction {
        SettingsAction::Save(self.draft.clone())
    }

    /// Restore defaults and apply them right away. The gap policy is not
    /// part of the panel and survives a reset.
    pub fn reset(&mut self) -> SettingsAction {
        let gaps = self.draft.gaps;
        self.draft = DisplayOptions {
            gaps,
            ..DisplayOptions::default()
        };
        SettingsAction::Save(self.draft.clone())
    }

    pub fn close(&self) -> SettingsAction {
        SettingsAction::Close
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::GapPolicy;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn open_default() -> SettingsDraft {
        SettingsDraft::open(
            &DisplayOptions::default(),
            &keys(&["netIncome", "totalRevenue"]),
            &keys(&["totalAssets"]),
        )
    }

    #[test]
    fn test_panel_layout_groups() {
        let panel = open_default();
        let headings: Vec<_> = panel
            .items()
            .iter()
            .filter_map(|item| match item {
                SettingsItem::Heading(h) => Some(*h),
                _ => None,
            })
            .collect();
        assert_eq!(
            headings,
            vec![
                "Income Statement Options",
                "Balance Sheet Options",
                "Scale Options",
                "Quarterly vs Annual"
            ]
        );
        // Cursor starts on the first selectable row
        assert_eq!(
            panel.items()[panel.cursor()],
            SettingsItem::Metric("netIncome".to_string())
        );
    }

    #[test]
    fn test_item_text_markers() {
        let panel = open_default();
        assert_eq!(
            panel.item_text(&SettingsItem::Metric("netIncome".to_string())),
            "[x] Net Income"
        );
        assert_eq!(
            panel.item_text(&SettingsItem::Metric("totalAssets".to_string())),
            "[ ] Total Assets"
        );
        assert_eq!(
            panel.item_text(&SettingsItem::Scale(Scale::Normal)),
            "(*) Normal Scale"
        );
        assert_eq!(
            panel.item_text(&SettingsItem::Cadence(Cadence::Annual)),
            "( ) Show Annual Report"
        );
    }

    #[test]
    fn test_cursor_skips_headings() {
        let mut panel = open_default();
        panel.move_down(); // totalRevenue
        panel.move_down(); // skips heading -> totalAssets
        assert_eq!(
            panel.items()[panel.cursor()],
            SettingsItem::Metric("totalAssets".to_string())
        );
        panel.move_up();
        panel.move_up();
        panel.move_up(); // already at the top
        assert_eq!(
            panel.items()[panel.cursor()],
            SettingsItem::Metric("netIncome".to_string())
        );
    }

    #[test]
    fn test_edits_stay_in_draft_until_save() {
        let current = DisplayOptions::default();
        let mut panel = SettingsDraft::open(&current, &keys(&["netIncome"]), &[]);
        panel.toggle_metric("netIncome");
        panel.set_scale(Scale::Millions);
        panel.set_cadence(Cadence::Annual);

        assert!(current.is_selected("netIncome"));
        assert_eq!(panel.close(), SettingsAction::Close);

        match panel.save() {
            SettingsAction::Save(saved) => {
                assert!(!saved.is_selected("netIncome"));
                assert_eq!(saved.scale, Scale::Millions);
                assert_eq!(saved.cadence, Cadence::Annual);
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }

    #[test]
    fn test_activate_on_rows() {
        let mut panel = open_default();
        assert_eq!(panel.activate(), SettingsAction::None);
        assert!(!panel.draft().is_selected("netIncome"));

        while panel.items()[panel.cursor()] != SettingsItem::Scale(Scale::Billions) {
            panel.move_down();
        }
        panel.activate();
        assert_eq!(panel.draft().scale, Scale::Billions);

        while panel.items()[panel.cursor()] != SettingsItem::Save {
            panel.move_down();
        }
        assert!(matches!(panel.activate(), SettingsAction::Save(_)));
    }

    #[test]
    fn test_reset_restores_defaults_but_keeps_gap_policy() {
        let current = DisplayOptions {
            scale: Scale::Billions,
            cadence: Cadence::Annual,
            gaps: GapPolicy::Zero,
            selected: Default::default(),
        };
        let mut panel = SettingsDraft::open(&current, &[], &[]);

        match panel.reset() {
            SettingsAction::Save(options) => {
                assert_eq!(options.scale, Scale::Normal);
                assert_eq!(options.cadence, Cadence::Quarterly);
                assert_eq!(options.gaps, GapPolicy::Zero);
                assert_eq!(
                    options.selected_metrics(),
                    vec!["netIncome", "totalRevenue", "totalShareholderEquity"]
                );
            }
            other => panic!("unexpected action: {:?}", other),
        }
    }
}
