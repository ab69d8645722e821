use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::options::Scale;

pub mod formatters;
pub mod runner;

#[derive(Parser)]
#[command(name = "fundview")]
#[command(
    version,
    about = "Income statement and balance sheet dashboard for listed companies"
)]
#[command(
    long_about = "Fetch a company's income statement and balance sheet from Alpha Vantage, reconcile them on a shared fiscal-date axis and chart the selected metrics in the terminal."
)]
pub struct Cli {
    /// Disable colorized/ANSI output
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Output results in JSON format
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Read statements saved with `fundview save` instead of calling the API
    #[arg(long = "data-dir", global = true, env = "FUNDVIEW_DATA_DIR", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Config file (defaults to <config dir>/fundview/config.toml)
    #[arg(long = "config", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    /// True when the command takes over the terminal.
    pub fn is_dashboard(&self) -> bool {
        matches!(self.command, None | Some(Commands::Dashboard { .. }))
    }
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// Interactive chart dashboard (default)
    Dashboard {
        /// Ticker to load on start (defaults to the configured symbol)
        symbol: Option<String>,
    },

    /// Print the reconciled series as a table
    Show {
        /// Ticker symbol (e.g., IBM, MSFT)
        symbol: String,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// List the chartable metric keys of each statement
    Metrics {
        /// Ticker symbol
        symbol: String,
    },

    /// Write the reconciled series to a CSV file
    Export {
        /// Ticker symbol
        symbol: String,

        /// Output CSV path
        file: PathBuf,

        #[command(flatten)]
        view: ViewArgs,
    },

    /// Store raw statement JSON for offline use with --data-dir
    Save {
        /// Ticker symbol
        symbol: String,

        /// Target directory
        dir: PathBuf,
    },
}

/// Display overrides shared by `show` and `export`.
#[derive(Args, Debug, Clone, Default, PartialEq)]
pub struct ViewArgs {
    /// Use annual instead of quarterly reports
    #[arg(long)]
    pub annual: bool,

    /// Value scale: normal, thousands, millions, billions
    #[arg(long, value_name = "SCALE")]
    pub scale: Option<Scale>,

    /// Metric key to include (repeatable; replaces the configured selection)
    #[arg(long = "metric", value_name = "KEY")]
    pub metrics: Vec<String>,

    /// Plot missing values as zero instead of leaving gaps
    #[arg(long = "zero-fill")]
    pub zero_fill: bool,
}
