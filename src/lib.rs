//! Fundview - income statement and balance sheet dashboard
//!
//! This library fetches a company's income statement and balance sheet,
//! reconciles them on a shared fiscal-date axis and builds the chart and
//! table views used by the `fundview` binary.

pub mod api;
pub mod chart;
pub mod cli;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod options;
pub mod reconcile;
pub mod settings;
pub mod state;
pub mod statement;
pub mod ui;
pub mod utils;
