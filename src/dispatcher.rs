//! Command dispatcher that routes parsed CLI commands to their handlers.
//!
//! Every handler fetches through the same [`Source`], so `--data-dir` swaps
//! the API for saved files without the handlers noticing.

use std::io::{self, IsTerminal};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context as _, Result};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{error, info};

use crate::api::{self, Source, StatementPair, StatementSource};
use crate::cli::formatters;
use crate::cli::runner::display_options;
use crate::cli::{Commands, ViewArgs};
use crate::config::AppConfig;
use crate::error::FundviewError;
use crate::options::DisplayOptions;
use crate::reconcile::{reconcile, Reconciled};
use crate::state::ViewState;
use crate::statement::{Statement, StatementKind};

/// What every handler needs: resolved config, a statement source and the
/// output mode.
pub struct Context {
    pub config: AppConfig,
    pub source: Source,
    pub json_output: bool,
}

/// Route a parsed command to its handler. `None` opens the dashboard.
pub async fn dispatch_command(command: Option<Commands>, ctx: &Context) -> Result<()> {
    match command {
        None => dispatch_dashboard(None, ctx).await,
        Some(Commands::Dashboard { symbol }) => dispatch_dashboard(symbol, ctx).await,
        Some(Commands::Show { symbol, view }) => dispatch_show(&symbol, &view, ctx).await,
        Some(Commands::Metrics { symbol }) => dispatch_metrics(&symbol, ctx).await,
        Some(Commands::Export { symbol, file, view }) => {
            dispatch_export(&symbol, &file, &view, ctx).await
        }
        Some(Commands::Save { symbol, dir }) => dispatch_save(&symbol, &dir, ctx).await,
    }
}

async fn dispatch_dashboard(symbol: Option<String>, ctx: &Context) -> Result<()> {
    let symbol = symbol.unwrap_or_else(|| ctx.config.default_symbol.clone());
    let state = ViewState::new(&symbol, ctx.config.display.clone());
    crate::ui::launch_dashboard(ctx.source.clone(), state).await
}

async fn dispatch_show(symbol: &str, view: &ViewArgs, ctx: &Context) -> Result<()> {
    let pair = fetch_pair(symbol, ctx).await?;
    let options = display_options(view, &ctx.config.display);
    let reconciled = reconcile_pair(&pair, &options);

    if ctx.json_output {
        println!(
            "{}",
            formatters::format_reconciled_json(&pair.symbol, &reconciled, &options)
        );
    } else if reconciled.is_empty() {
        print!("{}", formatters::format_empty_series(&pair.symbol));
    } else {
        print!(
            "{}",
            formatters::format_reconciled_table(&pair.symbol, &reconciled, &options)
        );
    }
    Ok(())
}

async fn dispatch_metrics(symbol: &str, ctx: &Context) -> Result<()> {
    let pair = fetch_pair(symbol, ctx).await?;

    if ctx.json_output {
        println!("{}", formatters::format_metrics_json(&pair));
    } else {
        print!("{}", formatters::format_metrics_table(&pair));
    }
    Ok(())
}

async fn dispatch_export(symbol: &str, file: &Path, view: &ViewArgs, ctx: &Context) -> Result<()> {
    let pair = fetch_pair(symbol, ctx).await?;
    let options = display_options(view, &ctx.config.display);
    let reconciled = reconcile_pair(&pair, &options);

    let out = std::fs::File::create(file)
        .with_context(|| format!("Failed to create {}", file.display()))?;
    let rows = formatters::write_reconciled_csv(out, &reconciled, &options)
        .with_context(|| format!("Failed to write {}", file.display()))?;

    info!("Exported {} rows for {} to {}", rows, pair.symbol, file.display());
    if ctx.json_output {
        println!(
            "{}",
            serde_json::json!({ "symbol": pair.symbol, "rows": rows, "file": file })
        );
    } else {
        println!(
            "\n{} Exported {} rows to: {}\n",
            "✓".green().bold(),
            rows,
            file.display()
        );
    }
    Ok(())
}

/// Fetch both raw payloads and store them for `--data-dir`. Payloads are
/// validated first so an API error envelope is never saved as data.
async fn dispatch_save(symbol: &str, dir: &Path, ctx: &Context) -> Result<()> {
    let spinner = loading_spinner(ctx.json_output);
    let result = fetch_raw_pair(&ctx.source, symbol).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let (symbol, payloads) = result.inspect_err(|_| eprintln!("{}", formatters::format_fetch_error()))?;

    let mut saved = Vec::new();
    for (kind, payload) in payloads {
        saved.push(crate::api::file_source::save_statement(dir, kind, &symbol, &payload)?);
    }

    if ctx.json_output {
        println!("{}", serde_json::json!({ "symbol": symbol, "files": saved }));
    } else {
        println!("\n{} Saved statements for {}", "✓".green().bold(), symbol.bold());
        for path in &saved {
            println!("  {}", path.display());
        }
        println!();
    }
    Ok(())
}

async fn fetch_raw_pair(
    source: &Source,
    raw_symbol: &str,
) -> Result<(String, Vec<(StatementKind, serde_json::Value)>), FundviewError> {
    let symbol = api::normalize_symbol(raw_symbol)
        .inspect_err(|e| error!("Error saving financial data: {}", e))?;
    let mut payloads = Vec::new();
    for kind in [StatementKind::IncomeStatement, StatementKind::BalanceSheet] {
        let payload = source
            .fetch_raw(kind, &symbol)
            .await
            .and_then(|payload| Statement::from_json(payload.clone(), &symbol).map(|_| payload))
            .inspect_err(|e| error!("Error fetching {} data: {}", kind.title(), e))?;
        payloads.push((kind, payload));
    }
    Ok((symbol, payloads))
}

/// Fetch both statements with a spinner; on failure print the fixed
/// message and return the underlying error.
async fn fetch_pair(symbol: &str, ctx: &Context) -> Result<StatementPair> {
    let spinner = loading_spinner(ctx.json_output);
    let result = api::fetch_statements(&ctx.source, symbol).await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    result.map_err(|e| {
        eprintln!("{}", formatters::format_fetch_error());
        anyhow::Error::new(e)
    })
}

fn reconcile_pair(pair: &StatementPair, options: &DisplayOptions) -> Reconciled {
    reconcile(
        &pair.income,
        &pair.balance,
        options.cadence,
        &options.selected_metrics(),
        options.gaps,
    )
}

/// "Loading..." spinner on stderr, only for interactive terminals and
/// never in JSON mode.
fn loading_spinner(json_output: bool) -> Option<ProgressBar> {
    if json_output || !io::stderr().is_terminal() {
        return None;
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message("Loading...");
    pb.enable_steady_tick(Duration::from_millis(80));
    Some(pb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::FileSource;
    use serde_json::json;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    /// Collects formatted log output for assertions.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn write_fixture(dir: &Path, symbol: &str) {
        let income = json!({
            "symbol": symbol,
            "annualReports": [{"fiscalDateEnding": "2023-12-31", "netIncome": "7502000000"}],
            "quarterlyReports": [{"fiscalDateEnding": "2024-03-31", "netIncome": "1605000000"}]
        });
        let balance = json!({
            "symbol": symbol,
            "annualReports": [{"fiscalDateEnding": "2023-12-31", "totalShareholderEquity": "22533000000"}],
            "quarterlyReports": [{"fiscalDateEnding": "2024-03-31", "totalShareholderEquity": "23936000000"}]
        });
        crate::api::file_source::save_statement(dir, StatementKind::IncomeStatement, symbol, &income).unwrap();
        crate::api::file_source::save_statement(dir, StatementKind::BalanceSheet, symbol, &balance).unwrap();
    }

    fn context(dir: &Path) -> Context {
        Context {
            config: AppConfig::default(),
            source: Source::Files(FileSource::new(dir)),
            json_output: true,
        }
    }

    #[tokio::test]
    async fn test_save_copies_payloads_between_dirs() {
        let from = TempDir::new().unwrap();
        let to = TempDir::new().unwrap();
        write_fixture(from.path(), "IBM");

        dispatch_command(
            Some(Commands::Save {
                symbol: "ibm".to_string(),
                dir: to.path().to_path_buf(),
            }),
            &context(from.path()),
        )
        .await
        .unwrap();

        assert!(to.path().join("IBM").join("income_statement.json").exists());
        assert!(to.path().join("IBM").join("balance_sheet.json").exists());
    }

    #[tokio::test]
    async fn test_save_refuses_error_payload() {
        let from = TempDir::new().unwrap();
        let to = TempDir::new().unwrap();
        let note = json!({"Note": "API call frequency exceeded"});
        crate::api::file_source::save_statement(from.path(), StatementKind::IncomeStatement, "IBM", &note).unwrap();

        let result = dispatch_command(
            Some(Commands::Save {
                symbol: "IBM".to_string(),
                dir: to.path().to_path_buf(),
            }),
            &context(from.path()),
        )
        .await;

        assert!(result.is_err());
        assert!(!to.path().join("IBM").exists());
    }

    #[tokio::test]
    async fn test_failed_save_is_logged() {
        let buffer = LogBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let from = TempDir::new().unwrap();
        let to = TempDir::new().unwrap();
        let note = json!({"Note": "API call frequency exceeded"});
        crate::api::file_source::save_statement(from.path(), StatementKind::IncomeStatement, "IBM", &note).unwrap();

        for symbol in ["IBM", ".."] {
            let result = dispatch_command(
                Some(Commands::Save {
                    symbol: symbol.to_string(),
                    dir: to.path().to_path_buf(),
                }),
                &context(from.path()),
            )
            .await;
            assert!(result.is_err());
        }

        let logs = buffer.contents();
        assert!(logs.contains("Error fetching Income Statement data"));
        assert!(logs.contains("Error saving financial data"));
    }

    #[tokio::test]
    async fn test_export_writes_csv() {
        let dir = TempDir::new().unwrap();
        write_fixture(dir.path(), "IBM");
        let file = dir.path().join("ibm.csv");

        dispatch_command(
            Some(Commands::Export {
                symbol: "IBM".to_string(),
                file: file.clone(),
                view: ViewArgs {
                    annual: true,
                    ..ViewArgs::default()
                },
            }),
            &context(dir.path()),
        )
        .await
        .unwrap();

        let csv = std::fs::read_to_string(&file).unwrap();
        assert_eq!(
            csv,
            "fiscalDateEnding,netIncome,totalRevenue,totalShareholderEquity\n\
             2023-12-31,7502000000,,22533000000\n"
        );
    }

    #[tokio::test]
    async fn test_missing_symbol_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = dispatch_command(
            Some(Commands::Show {
                symbol: "NOPE".to_string(),
                view: ViewArgs::default(),
            }),
            &context(dir.path()),
        )
        .await;

        let err = result.unwrap_err();
        assert!(err.downcast_ref::<FundviewError>().is_some_and(FundviewError::is_fetch_failure));
    }
}
