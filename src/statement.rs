//! Financial statement model
//!
//! Alpha Vantage returns each statement as two arrays of flat records
//! (`annualReports`, `quarterlyReports`). Every record carries a
//! `fiscalDateEnding` and a set of metric fields whose values are numbers
//! encoded as strings, or the literal `"None"`.

use std::collections::BTreeMap;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::FundviewError;

const FISCAL_DATE_KEY: &str = "fiscalDateEnding";
const CURRENCY_KEY: &str = "reportedCurrency";

/// Which statement a payload describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatementKind {
    IncomeStatement,
    BalanceSheet,
}

impl StatementKind {
    /// Value of the API `function` query parameter.
    pub fn api_function(&self) -> &'static str {
        match self {
            StatementKind::IncomeStatement => "INCOME_STATEMENT",
            StatementKind::BalanceSheet => "BALANCE_SHEET",
        }
    }

    /// File name used when a statement is saved to disk.
    pub fn file_name(&self) -> &'static str {
        match self {
            StatementKind::IncomeStatement => "income_statement.json",
            StatementKind::BalanceSheet => "balance_sheet.json",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StatementKind::IncomeStatement => "Income Statement",
            StatementKind::BalanceSheet => "Balance Sheet",
        }
    }
}

/// A single field value inside a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Number(f64),
    Text(String),
}

impl MetricValue {
    /// Parse a raw JSON value. Numeric strings become numbers; anything
    /// else (including `"None"` and the empty string) stays text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Number(n) => match n.as_f64() {
                Some(f) if f.is_finite() => MetricValue::Number(f),
                _ => MetricValue::Text(n.to_string()),
            },
            Value::String(s) => Self::parse(s),
            Value::Null => MetricValue::Text("None".to_string()),
            other => MetricValue::Text(other.to_string()),
        }
    }

    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.parse::<f64>() {
            Ok(f) if f.is_finite() && !trimmed.is_empty() => MetricValue::Number(f),
            _ => MetricValue::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetricValue::Number(f) => Some(*f),
            MetricValue::Text(_) => None,
        }
    }
}

/// One reporting period of a statement.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub fiscal_date_ending: String,
    pub reported_currency: Option<String>,
    pub fields: BTreeMap<String, MetricValue>,
}

impl Report {
    /// Build a report from a raw record. Records without a fiscal date are
    /// unusable for charting and yield `None`.
    pub fn from_record(record: &serde_json::Map<String, Value>) -> Option<Self> {
        let fiscal_date_ending = record.get(FISCAL_DATE_KEY)?.as_str()?.trim().to_string();
        if fiscal_date_ending.is_empty() {
            return None;
        }

        let reported_currency = record
            .get(CURRENCY_KEY)
            .and_then(Value::as_str)
            .map(str::to_string);

        let fields = record
            .iter()
            .filter(|(key, _)| key.as_str() != FISCAL_DATE_KEY && key.as_str() != CURRENCY_KEY)
            .map(|(key, value)| (key.clone(), MetricValue::from_json(value)))
            .collect();

        Some(Report {
            fiscal_date_ending,
            reported_currency,
            fields,
        })
    }

    /// Numeric value of a metric, if the field exists and is a number.
    pub fn value(&self, metric: &str) -> Option<f64> {
        self.fields.get(metric).and_then(MetricValue::as_f64)
    }

    /// Metric keys whose values are numeric in this report.
    pub fn numeric_keys(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, value)| value.as_f64().is_some())
            .map(|(key, _)| key.as_str())
    }
}

/// A fetched statement: both report lists for one symbol.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Statement {
    pub symbol: String,
    pub annual_reports: Vec<Report>,
    pub quarterly_reports: Vec<Report>,
}

/// Raw response shape, including the error envelopes the API returns with
/// HTTP 200.
#[derive(Debug, Deserialize)]
struct RawStatement {
    symbol: Option<String>,
    #[serde(rename = "annualReports")]
    annual_reports: Option<Vec<serde_json::Map<String, Value>>>,
    #[serde(rename = "quarterlyReports")]
    quarterly_reports: Option<Vec<serde_json::Map<String, Value>>>,
    #[serde(rename = "Error Message")]
    error_message: Option<String>,
    #[serde(rename = "Note")]
    note: Option<String>,
    #[serde(rename = "Information")]
    information: Option<String>,
}

impl Statement {
    /// Parse an API payload into a statement.
    ///
    /// Error envelopes (`Error Message`, `Note`, `Information`) and payloads
    /// without any report array are reported as [`FundviewError::Api`].
    pub fn from_json(value: Value, fallback_symbol: &str) -> Result<Self, FundviewError> {
        let raw: RawStatement = serde_json::from_value(value)
            .map_err(|e| FundviewError::Api(format!("unexpected response shape: {}", e)))?;

        if let Some(message) = raw.error_message.or(raw.note).or(raw.information) {
            return Err(FundviewError::Api(message));
        }

        if raw.annual_reports.is_none() && raw.quarterly_reports.is_none() {
            return Err(FundviewError::Api(format!(
                "no statement data returned for {}",
                fallback_symbol
            )));
        }

        let symbol = raw
            .symbol
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(|| fallback_symbol.to_string());

        let annual_reports = parse_reports(raw.annual_reports.unwrap_or_default(), &symbol);
        let quarterly_reports = parse_reports(raw.quarterly_reports.unwrap_or_default(), &symbol);

        Ok(Statement {
            symbol,
            annual_reports,
            quarterly_reports,
        })
    }

    /// Numeric metric keys offered in the settings panel.
    ///
    /// Keys come from the first annual report; when there are no annual
    /// reports the first quarterly report is used instead.
    pub fn metric_keys(&self) -> Vec<String> {
        self.annual_reports
            .first()
            .or_else(|| self.quarterly_reports.first())
            .map(|report| report.numeric_keys().map(str::to_string).collect())
            .unwrap_or_default()
    }
}

fn parse_reports(records: Vec<serde_json::Map<String, Value>>, symbol: &str) -> Vec<Report> {
    records
        .iter()
        .filter_map(|record| {
            let report = Report::from_record(record);
            if report.is_none() {
                warn!("Skipping {} report without fiscal date", symbol);
            }
            report
        })
        .collect()
}

/// Union of metric keys across statements, without duplicates, in first-seen order.
pub fn combined_metric_keys<'a>(statements: impl IntoIterator<Item = &'a Statement>) -> Vec<String> {
    statements
        .into_iter()
        .flat_map(Statement::metric_keys)
        .unique()
        .collect()
}
