//! Display options: scale, cadence, gap handling and metric selection.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::statement::{Report, Statement};
use crate::utils::format_number;

/// Metrics plotted before the user picks any.
pub const DEFAULT_METRICS: &[&str] = &["netIncome", "totalRevenue", "totalShareholderEquity"];

/// Display-only divisor applied to raw dollar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    #[default]
    Normal,
    Thousands,
    Millions,
    Billions,
}

impl Scale {
    pub const ALL: [Scale; 4] = [
        Scale::Normal,
        Scale::Thousands,
        Scale::Millions,
        Scale::Billions,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Scale::Normal => "normal",
            Scale::Thousands => "thousands",
            Scale::Millions => "millions",
            Scale::Billions => "billions",
        }
    }

    pub fn divisor(&self) -> f64 {
        match self {
            Scale::Normal => 1.0,
            Scale::Thousands => 1e3,
            Scale::Millions => 1e6,
            Scale::Billions => 1e9,
        }
    }

    /// Unit label: `$`, `$K`, `$M` or `$B`.
    pub fn unit(&self) -> &'static str {
        match self {
            Scale::Normal => "$",
            Scale::Thousands => "$K",
            Scale::Millions => "$M",
            Scale::Billions => "$B",
        }
    }

    /// Label shown next to the radio button in the settings panel.
    pub fn label(&self) -> &'static str {
        match self {
            Scale::Normal => "Normal Scale",
            Scale::Thousands => "Thousands Scale",
            Scale::Millions => "Millions Scale",
            Scale::Billions => "Billions Scale",
        }
    }

    pub fn axis_title(&self) -> String {
        format!("Value ({})", self.unit())
    }

    pub fn apply(&self, value: f64) -> f64 {
        value / self.divisor()
    }

    /// Scaled value with its unit, e.g. `2.5 ($B)`.
    pub fn format(&self, value: f64) -> String {
        format!("{} ({})", format_number(self.apply(value)), self.unit())
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" | "1" => Ok(Scale::Normal),
            "thousands" | "k" => Ok(Scale::Thousands),
            "millions" | "m" => Ok(Scale::Millions),
            "billions" | "b" => Ok(Scale::Billions),
            other => Err(format!(
                "unknown scale '{}' (expected normal, thousands, millions or billions)",
                other
            )),
        }
    }
}

/// Whether quarterly or annual reports feed the chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    #[default]
    Quarterly,
    Annual,
}

impl Cadence {
    pub const ALL: [Cadence; 2] = [Cadence::Quarterly, Cadence::Annual];

    pub fn as_str(&self) -> &'static str {
        match self {
            Cadence::Quarterly => "quarterly",
            Cadence::Annual => "annual",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Cadence::Quarterly => "Show Quarterly Report",
            Cadence::Annual => "Show Annual Report",
        }
    }

    /// Time unit of the x axis.
    pub fn time_unit(&self) -> &'static str {
        match self {
            Cadence::Quarterly => "quarter",
            Cadence::Annual => "year",
        }
    }

    /// The report list this cadence reads. Never mutates the statement.
    pub fn reports<'a>(&self, statement: &'a Statement) -> &'a [Report] {
        match self {
            Cadence::Quarterly => &statement.quarterly_reports,
            Cadence::Annual => &statement.annual_reports,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Cadence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quarterly" | "q" => Ok(Cadence::Quarterly),
            "annual" | "a" | "yearly" => Ok(Cadence::Annual),
            other => Err(format!(
                "unknown cadence '{}' (expected quarterly or annual)",
                other
            )),
        }
    }
}

/// What a date with no value in either statement turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GapPolicy {
    /// Leave the point out of the series.
    #[default]
    Skip,
    /// Plot the point as zero.
    Zero,
}

impl GapPolicy {
    pub fn fill(&self) -> Option<f64> {
        match self {
            GapPolicy::Skip => None,
            GapPolicy::Zero => Some(0.0),
        }
    }
}

impl FromStr for GapPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "skip" => Ok(GapPolicy::Skip),
            "zero" => Ok(GapPolicy::Zero),
            other => Err(format!("unknown gap policy '{}' (expected skip or zero)", other)),
        }
    }
}

/// User-chosen display options.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayOptions {
    pub scale: Scale,
    pub cadence: Cadence,
    pub gaps: GapPolicy,
    /// Metric name -> include in chart.
    pub selected: BTreeMap<String, bool>,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            scale: Scale::default(),
            cadence: Cadence::default(),
            gaps: GapPolicy::default(),
            selected: default_selection(),
        }
    }
}

impl DisplayOptions {
    /// Selected metrics in map order.
    pub fn selected_metrics(&self) -> Vec<&str> {
        self.selected
            .iter()
            .filter(|(_, on)| **on)
            .map(|(metric, _)| metric.as_str())
            .collect()
    }

    pub fn is_selected(&self, metric: &str) -> bool {
        self.selected.get(metric).copied().unwrap_or(false)
    }

    pub fn set_selected(&mut self, metric: &str, on: bool) {
        self.selected.insert(metric.to_string(), on);
    }

    /// Replace the selection with exactly these metrics.
    pub fn select_only<I, S>(&mut self, metrics: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = metrics.into_iter().map(|m| (m.into(), true)).collect();
    }
}

pub fn default_selection() -> BTreeMap<String, bool> {
    DEFAULT_METRICS
        .iter()
        .map(|metric| (metric.to_string(), true))
        .collect()
}
