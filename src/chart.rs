//! Chart model built from reconciled series.
//!
//! A [`ChartModel`] is the "chart instance": everything the renderer needs
//! (labels, datasets, axis titles, tick and tooltip text) computed up front
//! so drawing stays a thin layer over the widget library.

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::options::{Cadence, Scale};
use crate::reconcile::Reconciled;

pub const X_AXIS_TITLE: &str = "Fiscal Date Ending";

/// Fixed dataset palette, indexed by dataset position.
pub const PALETTE: &[(u8, u8, u8)] = &[
    (0x36, 0xA2, 0xEB),
    (0xFF, 0x63, 0x84),
    (0x4B, 0xC0, 0xC0),
    (0xFF, 0x9F, 0x40),
    (0x99, 0x66, 0xFF),
    (0xFF, 0xCD, 0x56),
    (0xC9, 0xCB, 0xCF),
    (0x2E, 0xCC, 0x71),
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub color: (u8, u8, u8),
    /// Raw values aligned to [`ChartModel::labels`].
    pub data: Vec<Option<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartModel {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
    pub scale: Scale,
    pub cadence: Cadence,
}

impl ChartModel {
    pub fn new(reconciled: &Reconciled, scale: Scale, cadence: Cadence) -> Self {
        let datasets = reconciled
            .series
            .iter()
            .enumerate()
            .map(|(idx, series)| Dataset {
                label: series.metric.clone(),
                color: PALETTE[idx % PALETTE.len()],
                data: series.values.clone(),
            })
            .collect();

        Self {
            labels: reconciled.dates.clone(),
            datasets,
            scale,
            cadence,
        }
    }

    pub fn x_title(&self) -> &'static str {
        X_AXIS_TITLE
    }

    pub fn y_title(&self) -> String {
        self.scale.axis_title()
    }

    pub fn time_unit(&self) -> &'static str {
        self.cadence.time_unit()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty() || self.datasets.iter().all(|d| d.data.iter().all(Option::is_none))
    }

    /// Y-axis bounds in raw dollars. The axis always includes zero.
    pub fn y_bounds(&self) -> (f64, f64) {
        let (min, max) = self
            .datasets
            .iter()
            .flat_map(|d| d.data.iter().flatten())
            .fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(*v), hi.max(*v)));

        if min == max {
            (min, min + 1.0)
        } else {
            (min, max)
        }
    }

    /// `count` evenly spaced tick values between the y bounds.
    pub fn y_ticks(&self, count: usize) -> Vec<f64> {
        let (min, max) = self.y_bounds();
        match count {
            0 => Vec::new(),
            1 => vec![min],
            _ => {
                let step = (max - min) / (count - 1) as f64;
                (0..count).map(|i| min + step * i as f64).collect()
            }
        }
    }

    pub fn tick_label(&self, value: f64) -> String {
        self.scale.format(value)
    }

    /// Short x-axis label for a date, by time unit: `2024 Q1` or `2024`.
    pub fn x_label(&self, idx: usize) -> Option<String> {
        let raw = self.labels.get(idx)?;
        let label = match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
            Ok(date) => match self.cadence {
                Cadence::Quarterly => {
                    format!("{} Q{}", date.year(), (date.month() - 1) / 3 + 1)
                }
                Cadence::Annual => date.format("%Y").to_string(),
            },
            Err(_) => raw.clone(),
        };
        Some(label)
    }

    /// Tooltip header for the date at `idx`.
    pub fn tooltip_title(&self, idx: usize) -> Option<String> {
        self.labels.get(idx).map(|raw| tooltip_title(raw))
    }

    /// One tooltip line per dataset with a value at `idx`.
    pub fn tooltip_lines(&self, idx: usize) -> Vec<String> {
        self.datasets
            .iter()
            .filter_map(|dataset| {
                let value = dataset.data.get(idx).copied().flatten()?;
                Some(tooltip_label(&dataset.label, value, self.scale))
            })
            .collect()
    }
}

/// `Fiscal Date: Mar 31, 2024`; unparseable labels are shown as-is.
pub fn tooltip_title(label: &str) -> String {
    let formatted = NaiveDate::parse_from_str(label, "%Y-%m-%d")
        .map(|date| date.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| label.to_string());
    format!("Fiscal Date: {}", formatted)
}

/// `netIncome: 2.5 ($B)`
pub fn tooltip_label(metric: &str, value: f64, scale: Scale) -> String {
    format!("{}: {}", metric, scale.format(value))
}
