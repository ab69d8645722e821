use reqwest::{Client, Url};
use serde_json::Value;
use tracing::{debug, info};

use super::StatementSource;
use crate::error::FundviewError;
use crate::statement::StatementKind;

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Alpha Vantage's public key; only serves the IBM sample data.
pub const DEMO_API_KEY: &str = "demo";

/// HTTP client for the Alpha Vantage fundamentals endpoints
#[derive(Debug, Clone)]
pub struct AlphaVantageClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, FundviewError> {
        let client = Client::builder()
            .user_agent(concat!("fundview/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FundviewError::Fetch(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// `{base}?function=INCOME_STATEMENT&symbol=IBM&apikey=...`
    pub fn statement_url(&self, kind: StatementKind, symbol: &str) -> Result<Url, FundviewError> {
        Url::parse_with_params(
            &self.base_url,
            &[
                ("function", kind.api_function()),
                ("symbol", symbol),
                ("apikey", self.api_key.as_str()),
            ],
        )
        .map_err(|e| FundviewError::Fetch(format!("invalid base url {}: {}", self.base_url, e)))
    }

    pub fn uses_demo_key(&self) -> bool {
        self.api_key == DEMO_API_KEY
    }
}

impl StatementSource for AlphaVantageClient {
    async fn fetch_raw(&self, kind: StatementKind, symbol: &str) -> Result<Value, FundviewError> {
        let url = self.statement_url(kind, symbol)?;
        info!(
            "Fetching {} for {} from Alpha Vantage",
            kind.api_function(),
            symbol
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| {
                FundviewError::Fetch(format!(
                    "failed to send request to Alpha Vantage: {}",
                    e.without_url()
                ))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FundviewError::Fetch(format!(
                "Alpha Vantage returned error status: {}",
                status
            )));
        }

        let body: Value = response.json().await.map_err(|e| {
            FundviewError::Fetch(format!(
                "failed to parse Alpha Vantage response: {}",
                e.without_url()
            ))
        })?;

        debug!("Received {} payload for {}", kind.api_function(), symbol);
        Ok(body)
    }
}
