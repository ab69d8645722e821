//! Output formatting module for CLI display
//!
//! Tables, JSON and CSV renderings of reconciled statement data. Nothing
//! here fetches or computes; callers pass in finished results.

use std::io;

use colored::Colorize;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{object::Columns, Alignment, Style},
    Table, Tabled,
};

use crate::api::StatementPair;
use crate::error::FETCH_ERROR_MESSAGE;
use crate::options::DisplayOptions;
use crate::reconcile::Reconciled;
use crate::statement::StatementKind;
use crate::utils::humanize_key;

/// Placeholder for a date with no value.
const MISSING: &str = "-";

/// Format reconciled series as a table: one row per fiscal date, one column
/// per metric.
pub fn format_reconciled_table(symbol: &str, reconciled: &Reconciled, options: &DisplayOptions) -> String {
    let mut output = format!(
        "\n{} Financial Data for {} ({}, {})\n\n",
        "📊".cyan().bold(),
        symbol.bold(),
        options.cadence.as_str(),
        options.scale.as_str()
    );

    let mut builder = Builder::default();
    let mut header = vec!["Fiscal Date".to_string()];
    header.extend(reconciled.series.iter().map(|s| s.metric.clone()));
    builder.push_record(header);

    for (idx, date) in reconciled.dates.iter().enumerate() {
        let mut row = vec![date.clone()];
        row.extend(reconciled.series.iter().map(|series| {
            series.values[idx]
                .map(|v| options.scale.format(v))
                .unwrap_or_else(|| MISSING.to_string())
        }));
        builder.push_record(row);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    // Right-align every value column; the date stays left
    table.modify(Columns::new(1..), Alignment::right());

    output.push_str(&table.to_string());
    output.push('\n');
    output
}

#[derive(Serialize)]
struct JsonSeries<'a> {
    metric: &'a str,
    values: Vec<Option<f64>>,
}

#[derive(Serialize)]
struct JsonReconciled<'a> {
    symbol: &'a str,
    cadence: &'a str,
    scale: &'a str,
    unit: &'a str,
    dates: &'a [String],
    series: Vec<JsonSeries<'a>>,
}

/// Format reconciled series for JSON output. Values are divided by the
/// selected scale; missing values are `null`.
pub fn format_reconciled_json(symbol: &str, reconciled: &Reconciled, options: &DisplayOptions) -> String {
    let report = JsonReconciled {
        symbol,
        cadence: options.cadence.as_str(),
        scale: options.scale.as_str(),
        unit: options.scale.unit(),
        dates: &reconciled.dates,
        series: reconciled
            .series
            .iter()
            .map(|series| JsonSeries {
                metric: &series.metric,
                values: series
                    .values
                    .iter()
                    .map(|v| v.map(|v| options.scale.apply(v)))
                    .collect(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Write reconciled series as CSV: `fiscalDateEnding,<metric>...`, scaled
/// values, empty cells for gaps. Returns the number of data rows.
pub fn write_reconciled_csv<W: io::Write>(
    writer: W,
    reconciled: &Reconciled,
    options: &DisplayOptions,
) -> csv::Result<usize> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["fiscalDateEnding".to_string()];
    header.extend(reconciled.series.iter().map(|s| s.metric.clone()));
    wtr.write_record(&header)?;

    for (idx, date) in reconciled.dates.iter().enumerate() {
        let mut record = vec![date.clone()];
        record.extend(reconciled.series.iter().map(|series| {
            series.values[idx]
                .map(|v| options.scale.apply(v).to_string())
                .unwrap_or_default()
        }));
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(reconciled.dates.len())
}

#[derive(Tabled)]
struct MetricRow {
    #[tabled(rename = "Statement")]
    statement: &'static str,
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Label")]
    label: String,
}

fn metric_rows(pair: &StatementPair) -> Vec<MetricRow> {
    [
        (StatementKind::IncomeStatement, &pair.income),
        (StatementKind::BalanceSheet, &pair.balance),
    ]
    .into_iter()
    .flat_map(|(kind, statement)| {
        statement.metric_keys().into_iter().map(move |key| MetricRow {
            statement: kind.title(),
            label: humanize_key(&key),
            key,
        })
    })
    .collect()
}

/// Format the chartable metric keys of both statements.
pub fn format_metrics_table(pair: &StatementPair) -> String {
    let rows = metric_rows(pair);
    let mut output = format!(
        "\n{} Metrics for {}\n\n",
        "📋".cyan().bold(),
        pair.symbol.bold()
    );

    let mut table = Table::new(&rows);
    table.with(Style::modern());
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\n{} {} metrics\n",
        "Total:".bold(),
        rows.len()
    ));
    output
}

/// Format the metric keys for JSON output, grouped by statement.
pub fn format_metrics_json(pair: &StatementPair) -> String {
    #[derive(Serialize)]
    struct JsonMetrics {
        symbol: String,
        income_statement: Vec<String>,
        balance_sheet: Vec<String>,
    }

    let report = JsonMetrics {
        symbol: pair.symbol.clone(),
        income_statement: pair.income.metric_keys(),
        balance_sheet: pair.balance.metric_keys(),
    };

    serde_json::to_string_pretty(&report)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Message for a symbol whose selected metrics produced no rows.
pub fn format_empty_series(symbol: &str) -> String {
    format!(
        "{} No data for {} with the selected metrics\nList available metrics with: {} metrics {}\n",
        "ℹ".blue().bold(),
        symbol,
        "fundview".bold(),
        symbol
    )
}

/// The fixed fetch-failure message, in red.
pub fn format_fetch_error() -> String {
    format!("{} {}", "✗".red().bold(), FETCH_ERROR_MESSAGE.red())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Scale;
    use crate::reconcile::Series;
    use crate::statement::Statement;
    use serde_json::{json, Value};

    fn reconciled() -> Reconciled {
        Reconciled {
            dates: vec!["2023-12-31".to_string(), "2024-03-31".to_string()],
            series: vec![Series {
                metric: "netIncome".to_string(),
                values: vec![None, Some(2.5e9)],
            }],
        }
    }

    fn billions() -> DisplayOptions {
        DisplayOptions {
            scale: Scale::Billions,
            ..DisplayOptions::default()
        }
    }

    #[test]
    fn test_table_contains_scaled_values_and_gaps() {
        colored::control::set_override(false);
        let table = format_reconciled_table("IBM", &reconciled(), &billions());
        assert!(table.contains("Financial Data for IBM"));
        assert!(table.contains("(quarterly, billions)"));
        assert!(table.contains("2.5 ($B)"));
        assert!(table.contains("2023-12-31"));
        assert!(table.contains(MISSING));
    }

    #[test]
    fn test_json_uses_nulls_for_gaps() {
        let json: Value =
            serde_json::from_str(&format_reconciled_json("IBM", &reconciled(), &billions())).unwrap();
        assert_eq!(json["unit"], "$B");
        assert_eq!(json["dates"][1], "2024-03-31");
        assert_eq!(json["series"][0]["values"], json!([null, 2.5]));
    }

    #[test]
    fn test_csv_has_header_and_empty_cells() {
        let mut buf = Vec::new();
        let rows = write_reconciled_csv(&mut buf, &reconciled(), &billions()).unwrap();
        assert_eq!(rows, 2);
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "fiscalDateEnding,netIncome\n2023-12-31,\n2024-03-31,2.5\n"
        );
    }

    #[test]
    fn test_metrics_rows_cover_both_statements() {
        let income = Statement::from_json(
            json!({"annualReports": [{"fiscalDateEnding": "2023-12-31", "netIncome": "1"}]}),
            "IBM",
        )
        .unwrap();
        let balance = Statement::from_json(
            json!({"annualReports": [{"fiscalDateEnding": "2023-12-31", "totalAssets": "2"}]}),
            "IBM",
        )
        .unwrap();
        let pair = StatementPair {
            symbol: "IBM".to_string(),
            income,
            balance,
        };

        let rows = metric_rows(&pair);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].statement, "Income Statement");
        assert_eq!(rows[1].label, "Total Assets");

        let json: Value = serde_json::from_str(&format_metrics_json(&pair)).unwrap();
        assert_eq!(json["balance_sheet"], json!(["totalAssets"]));
    }

    #[test]
    fn test_fetch_error_message() {
        colored::control::set_override(false);
        assert!(format_fetch_error().contains(FETCH_ERROR_MESSAGE));
        assert!(format_empty_series("IBM").contains("No data for IBM"));
    }
}
