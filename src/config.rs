//! Configuration: optional TOML file plus environment overrides.
//!
//! Lookup order for the file: `--config`, `FUNDVIEW_CONFIG`, then
//! `<config_home>/fundview/config.toml`. Environment variables win over the
//! file: `ALPHA_VANTAGE_API_KEY` (or `API_KEY`) and `FUNDVIEW_BASE_URL`.
//!
//! ```toml
//! api_key = "XXXX"
//! default_symbol = "MSFT"
//!
//! [display]
//! scale = "billions"
//! cadence = "annual"
//! gaps = "skip"
//! metrics = ["totalRevenue", "netIncome"]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::api::alpha_vantage::{AlphaVantageClient, DEFAULT_BASE_URL, DEMO_API_KEY};
use crate::api::{FileSource, Source};
use crate::error::FundviewError;
use crate::options::{Cadence, DisplayOptions, GapPolicy, Scale};

pub const DEFAULT_SYMBOL: &str = "IBM";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    base_url: Option<String>,
    default_symbol: Option<String>,
    display: DisplayConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct DisplayConfig {
    scale: Option<Scale>,
    cadence: Option<Cadence>,
    gaps: Option<GapPolicy>,
    metrics: Option<Vec<String>>,
}

/// Resolved application configuration
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub default_symbol: String,
    pub display: DisplayOptions,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            default_symbol: DEFAULT_SYMBOL.to_string(),
            display: DisplayOptions::default(),
        }
    }
}

impl AppConfig {
    /// Load config from disk and the process environment.
    ///
    /// An explicitly named file must exist; the default location is optional.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading config from {}", path.display());
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self, FundviewError> {
        let file: FileConfig =
            toml::from_str(text).map_err(|e| FundviewError::Config(e.to_string()))?;

        let mut config = Self::default();
        config.api_key = file.api_key.filter(|k| !k.trim().is_empty());
        if let Some(base_url) = file.base_url {
            config.base_url = base_url;
        }
        if let Some(symbol) = file.default_symbol {
            config.default_symbol = symbol;
        }

        let display = file.display;
        if let Some(scale) = display.scale {
            config.display.scale = scale;
        }
        if let Some(cadence) = display.cadence {
            config.display.cadence = cadence;
        }
        if let Some(gaps) = display.gaps {
            config.display.gaps = gaps;
        }
        if let Some(metrics) = display.metrics {
            if metrics.is_empty() {
                return Err(FundviewError::Config(
                    "display.metrics must name at least one metric".to_string(),
                ));
            }
            config.display.select_only(metrics);
        }

        Ok(config)
    }

    /// Apply environment overrides through `lookup`.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ALPHA_VANTAGE_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|k| !k.trim().is_empty());
        if api_key.is_some() {
            self.api_key = api_key;
        }
        if let Some(base_url) = lookup("FUNDVIEW_BASE_URL").filter(|u| !u.trim().is_empty()) {
            self.base_url = base_url;
        }
    }

    /// API key to send, falling back to the public demo key.
    pub fn effective_api_key(&self) -> &str {
        self.api_key.as_deref().unwrap_or(DEMO_API_KEY)
    }

    /// Build the statement source: saved files when `data_dir` is given,
    /// the HTTP API otherwise.
    pub fn source(&self, data_dir: Option<&Path>) -> Result<Source> {
        if let Some(dir) = data_dir {
            debug!("Reading statements from {}", dir.display());
            return Ok(Source::Files(FileSource::new(dir)));
        }

        if self.api_key.is_none() {
            warn!("No Alpha Vantage API key configured; using the demo key (IBM only)");
        }
        let client = AlphaVantageClient::new(&self.base_url, self.effective_api_key())?;
        Ok(Source::AlphaVantage(client))
    }
}

/// `FUNDVIEW_CONFIG`, else `<config_home>/fundview/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os("FUNDVIEW_CONFIG")
        .map(PathBuf::from)
        .or_else(|| dir_spec::config_home().map(|dir| dir.join("fundview").join("config.toml")))
}

/// Directory for the dashboard log file.
pub fn log_dir() -> Option<PathBuf> {
    dir_spec::cache_home().map(|dir| dir.join("fundview"))
}
