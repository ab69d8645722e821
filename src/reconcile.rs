//! Reconciles income-statement and balance-sheet rows into chartable series.
//!
//! The date axis is the sorted union of fiscal dates from both statements.
//! For each selected metric the income statement wins when it has a value
//! for a date, then the balance sheet, then the gap policy.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::options::{Cadence, GapPolicy};
use crate::statement::{Report, Statement};

/// One labeled series aligned to [`Reconciled::dates`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub metric: String,
    pub values: Vec<Option<f64>>,
}

impl Series {
    /// Points that carry a value, as `(date index, value)`.
    pub fn points(&self) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.values
            .iter()
            .enumerate()
            .filter_map(|(idx, value)| value.map(|v| (idx, v)))
    }
}

/// Output of [`reconcile`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Reconciled {
    pub dates: Vec<String>,
    pub series: Vec<Series>,
}

impl Reconciled {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn series_for(&self, metric: &str) -> Option<&Series> {
        self.series.iter().find(|s| s.metric == metric)
    }
}

/// Merge both statements into one series per selected metric.
pub fn reconcile(
    income: &Statement,
    balance: &Statement,
    cadence: Cadence,
    metrics: &[&str],
    gaps: GapPolicy,
) -> Reconciled {
    let income_reports = cadence.reports(income);
    let balance_reports = cadence.reports(balance);

    let dates: Vec<String> = income_reports
        .iter()
        .chain(balance_reports)
        .map(|report| report.fiscal_date_ending.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let series = metrics
        .iter()
        .map(|metric| {
            let from_income = values_by_date(income_reports, metric);
            let from_balance = values_by_date(balance_reports, metric);

            let values = dates
                .iter()
                .map(|date| {
                    from_income
                        .get(date.as_str())
                        .or_else(|| from_balance.get(date.as_str()))
                        .copied()
                        .or_else(|| gaps.fill())
                })
                .collect();

            Series {
                metric: metric.to_string(),
                values,
            }
        })
        .collect();

    debug!(
        "Reconciled {} {} dates for {} metrics",
        dates.len(),
        cadence,
        metrics.len()
    );

    Reconciled { dates, series }
}

/// Numeric values of `metric` keyed by fiscal date. Later rows for the same
/// date overwrite earlier ones.
fn values_by_date<'a>(reports: &'a [Report], metric: &str) -> HashMap<&'a str, f64> {
    reports
        .iter()
        .filter_map(|report| {
            report
                .value(metric)
                .map(|value| (report.fiscal_date_ending.as_str(), value))
        })
        .collect()
}
