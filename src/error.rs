//! Error handling for fundview
//!
//! Defines the typed errors raised by the fetch layer, the renderer and the
//! config loader, plus the fixed message shown to users when a fetch fails.

use thiserror::Error;

/// Message surfaced to the user for every failed fetch, whatever the cause.
pub const FETCH_ERROR_MESSAGE: &str = "Failed to fetch financial data. Please try again.";

/// Core error types for statement fetching and rendering
#[derive(Error, Debug)]
pub enum FundviewError {
    #[error("fetch error: {0}")]
    Fetch(String),

    #[error("api error: {0}")]
    Api(String),

    #[error("invalid symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("missing draw area: {0}")]
    MissingDrawArea(String),

    #[error("config error: {0}")]
    Config(String),
}

impl FundviewError {
    /// True for errors that end up as [`FETCH_ERROR_MESSAGE`] in the UI.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            FundviewError::Fetch(_) | FundviewError::Api(_) | FundviewError::InvalidSymbol(_)
        )
    }

    /// Message shown to the user for this error.
    pub fn user_message(&self) -> String {
        if self.is_fetch_failure() {
            FETCH_ERROR_MESSAGE.to_string()
        } else {
            self.to_string()
        }
    }
}

/// Result type alias for fundview operations
pub type Result<T> = anyhow::Result<T>;
