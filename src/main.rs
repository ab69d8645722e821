use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal};
use std::sync::Mutex;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fundview::cli::Cli;
use fundview::config::{self, AppConfig};
use fundview::dispatcher::{dispatch_command, Context};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.is_dashboard());

    if cli.no_color || !io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    let config = AppConfig::load(cli.config.as_deref())?;
    let source = config.source(cli.data_dir.as_deref())?;
    let ctx = Context {
        config,
        source,
        json_output: cli.json,
    };

    dispatch_command(cli.command, &ctx).await
}

/// CLI commands log to stderr. The dashboard owns the terminal, so it logs
/// to `<cache dir>/fundview/fundview.log`, or nowhere if that can't be opened.
fn init_logging(dashboard: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    if !dashboard {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
        return;
    }

    let Some(dir) = config::log_dir() else {
        return;
    };
    let file = fs::create_dir_all(&dir).and_then(|_| {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("fundview.log"))
    });
    if let Ok(file) = file {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    }
}
