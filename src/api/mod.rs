//! Statement fetch layer.
//!
//! Two sources implement [`StatementSource`]: the Alpha Vantage HTTP API and
//! a directory of previously saved responses. [`fetch_statements`] runs the
//! income-statement and balance-sheet fetches one after the other.

pub mod alpha_vantage;
pub mod file_source;

use std::future::Future;

use serde_json::Value;
use tracing::{error, info};

use crate::error::FundviewError;
use crate::statement::{Statement, StatementKind};

pub use alpha_vantage::AlphaVantageClient;
pub use file_source::FileSource;

/// Longest ticker accepted before any request is made.
const MAX_SYMBOL_LEN: usize = 12;

/// Anything that can produce raw statement payloads for a symbol.
pub trait StatementSource {
    /// Fetch the raw JSON payload of one statement.
    fn fetch_raw(
        &self,
        kind: StatementKind,
        symbol: &str,
    ) -> impl Future<Output = Result<Value, FundviewError>> + Send;
}

/// Where statements come from, picked once at startup.
#[derive(Debug, Clone)]
pub enum Source {
    AlphaVantage(AlphaVantageClient),
    Files(FileSource),
}

impl StatementSource for Source {
    async fn fetch_raw(&self, kind: StatementKind, symbol: &str) -> Result<Value, FundviewError> {
        match self {
            Source::AlphaVantage(client) => client.fetch_raw(kind, symbol).await,
            Source::Files(files) => files.fetch_raw(kind, symbol).await,
        }
    }
}

/// Both statements of one symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct StatementPair {
    pub symbol: String,
    pub income: Statement,
    pub balance: Statement,
}

/// Trim and upper-case a user-entered ticker, rejecting anything that can
/// not be a ticker. The result is also used as a directory name, so it must
/// start with a letter or digit.
pub fn normalize_symbol(raw: &str) -> Result<String, FundviewError> {
    let symbol = raw.trim().to_uppercase();
    let valid = symbol.len() <= MAX_SYMBOL_LEN
        && symbol.starts_with(|c: char| c.is_ascii_alphanumeric())
        && symbol
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

    if valid {
        Ok(symbol)
    } else {
        Err(FundviewError::InvalidSymbol(raw.to_string()))
    }
}

/// Fetch and parse one statement.
pub async fn fetch_statement<S: StatementSource>(
    source: &S,
    kind: StatementKind,
    symbol: &str,
) -> Result<Statement, FundviewError> {
    let raw = source.fetch_raw(kind, symbol).await?;
    Statement::from_json(raw, symbol)
}

/// Fetch the income statement, then the balance sheet. The second request
/// only starts once the first has completed; either failure aborts both.
pub async fn fetch_statements<S: StatementSource>(
    source: &S,
    raw_symbol: &str,
) -> Result<StatementPair, FundviewError> {
    let symbol = normalize_symbol(raw_symbol).inspect_err(|e| {
        error!("Error fetching financial data: {}", e);
    })?;

    info!("Fetching statements for {}", symbol);

    let income = fetch_statement(source, StatementKind::IncomeStatement, &symbol)
        .await
        .inspect_err(|e| error!("Error fetching income statement data: {}", e))?;

    let balance = fetch_statement(source, StatementKind::BalanceSheet, &symbol)
        .await
        .inspect_err(|e| error!("Error fetching balance sheet data: {}", e))?;

    Ok(StatementPair {
        symbol,
        income,
        balance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    /// Records call order and serves canned payloads.
    struct RecordingSource {
        calls: Mutex<Vec<StatementKind>>,
        fail_on: Option<StatementKind>,
    }

    impl RecordingSource {
        fn new(fail_on: Option<StatementKind>) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_on,
            }
        }
    }

    impl StatementSource for RecordingSource {
        async fn fetch_raw(
            &self,
            kind: StatementKind,
            symbol: &str,
        ) -> Result<Value, FundviewError> {
            self.calls.lock().unwrap().push(kind);
            if self.fail_on == Some(kind) {
                return Err(FundviewError::Fetch("connection reset".to_string()));
            }
            Ok(json!({
                "symbol": symbol,
                "annualReports": [],
                "quarterlyReports": [{"fiscalDateEnding": "2024-03-31", "netIncome": "1"}]
            }))
        }
    }

    #[test]
    fn test_normalize_symbol() {
        assert_eq!(normalize_symbol(" aapl ").unwrap(), "AAPL");
        assert_eq!(normalize_symbol("brk.b").unwrap(), "BRK.B");
        assert!(normalize_symbol("").is_err());
        assert!(normalize_symbol("   ").is_err());
        assert!(normalize_symbol("IBM&apikey=x").is_err());
        assert!(normalize_symbol("ABCDEFGHIJKLMN").is_err());
        assert!(normalize_symbol(".").is_err());
        assert!(normalize_symbol("..").is_err());
        assert!(normalize_symbol("-").is_err());
        assert!(normalize_symbol(".IBM").is_err());
        assert_eq!(normalize_symbol("bf-b").unwrap(), "BF-B");
    }

    #[tokio::test]
    async fn test_fetches_run_income_then_balance() {
        let source = RecordingSource::new(None);
        let pair = fetch_statements(&source, "ibm").await.unwrap();
        assert_eq!(pair.symbol, "IBM");
        assert_eq!(pair.income.quarterly_reports.len(), 1);
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec![StatementKind::IncomeStatement, StatementKind::BalanceSheet]
        );
    }

    #[tokio::test]
    async fn test_income_failure_skips_balance_fetch() {
        let source = RecordingSource::new(Some(StatementKind::IncomeStatement));
        let err = fetch_statements(&source, "IBM").await.unwrap_err();
        assert!(matches!(err, FundviewError::Fetch(_)));
        assert_eq!(
            *source.calls.lock().unwrap(),
            vec![StatementKind::IncomeStatement]
        );
    }

    #[tokio::test]
    async fn test_invalid_symbol_never_reaches_source() {
        let source = RecordingSource::new(None);
        let err = fetch_statements(&source, "").await.unwrap_err();
        assert!(matches!(err, FundviewError::InvalidSymbol(_)));
        assert!(source.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_dot_symbols_never_reach_source() {
        let source = RecordingSource::new(None);
        for raw in [".", "..", " .. "] {
            let err = fetch_statements(&source, raw).await.unwrap_err();
            assert!(matches!(err, FundviewError::InvalidSymbol(_)));
        }
        assert!(source.calls.lock().unwrap().is_empty());
    }
}
