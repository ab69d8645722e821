//! Saved statement payloads on disk.
//!
//! Layout: `<root>/<SYMBOL>/income_statement.json` and
//! `<root>/<SYMBOL>/balance_sheet.json`, exactly as returned by the API.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, info};

use super::StatementSource;
use crate::error::FundviewError;
use crate::statement::StatementKind;

#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn statement_path(&self, kind: StatementKind, symbol: &str) -> PathBuf {
        statement_path(&self.root, kind, symbol)
    }
}

impl StatementSource for FileSource {
    async fn fetch_raw(&self, kind: StatementKind, symbol: &str) -> Result<Value, FundviewError> {
        let path = self.statement_path(kind, symbol);
        debug!("Reading saved {} from {}", kind.api_function(), path.display());

        let bytes = tokio::fs::read(&path).await.map_err(|e| {
            FundviewError::Fetch(format!(
                "no saved {} for {} at {}: {}",
                kind.title(),
                symbol,
                path.display(),
                e
            ))
        })?;

        serde_json::from_slice(&bytes).map_err(|e| {
            FundviewError::Fetch(format!("invalid JSON in {}: {}", path.display(), e))
        })
    }
}

fn statement_path(root: &Path, kind: StatementKind, symbol: &str) -> PathBuf {
    root.join(symbol).join(kind.file_name())
}

/// Write a raw payload where [`FileSource`] will find it.
pub fn save_statement(
    root: &Path,
    kind: StatementKind,
    symbol: &str,
    payload: &Value,
) -> crate::error::Result<PathBuf> {
    let path = statement_path(root, kind, symbol);
    let dir = path
        .parent()
        .context("statement path has no parent directory")?;
    fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory {}", dir.display()))?;

    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, serde_json::to_vec_pretty(payload)?)
        .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, &path)
        .with_context(|| format!("Failed to finalize {}", path.display()))?;

    info!("Saved {} for {} to {}", kind.title(), symbol, path.display());
    Ok(path)
}
