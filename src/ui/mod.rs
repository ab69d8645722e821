//! Interactive terminal dashboard
//!
//! One UI loop owns the terminal. Each submission spawns a tokio task that
//! runs the sequential fetch pair and sends its outcome back over a channel;
//! outcomes are applied in the order they arrive.

pub mod app;
pub mod chart;
pub mod crossterm_engine;
pub mod event_loop;
pub mod overlays;

use std::time::Duration;

use anyhow::Result;
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing::{debug, info};

use crate::api::Source;
use crate::state::{run_request, FetchOutcome, PendingRequest, ViewState};
use app::DashboardApp;
use crossterm_engine::{DashboardTerminal, TerminalGuard};
use event_loop::{poll_event, AppEvent};

const TICK: Duration = Duration::from_millis(100);

/// Launch the dashboard and submit the initial symbol.
pub async fn launch_dashboard(source: Source, state: ViewState) -> Result<()> {
    info!("Starting dashboard for {}", state.symbol_input);
    let mut guard = TerminalGuard::enter()?;
    run_loop(guard.terminal_mut(), source, state).await
}

async fn run_loop(terminal: &mut DashboardTerminal, source: Source, state: ViewState) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<FetchOutcome>();
    let mut app = DashboardApp::new(state);

    if let Some(request) = app.submit() {
        spawn_fetch(&source, request, tx.clone());
    }

    loop {
        while let Ok(outcome) = rx.try_recv() {
            debug!("Applying outcome of request #{}", outcome.request_id);
            app.apply_outcome(outcome);
        }

        terminal.draw(|f| app.draw(f))?;

        let event = tokio::task::block_in_place(|| poll_event(TICK))?;
        if let AppEvent::Input(key) = event {
            if let Some(request) = app.handle_key(key) {
                spawn_fetch(&source, request, tx.clone());
            }
        }

        if app.should_quit() {
            info!("Dashboard closed");
            return Ok(());
        }
    }
}

fn spawn_fetch(source: &Source, request: PendingRequest, tx: UnboundedSender<FetchOutcome>) {
    let source = source.clone();
    tokio::spawn(async move {
        let outcome = run_request(&source, request).await;
        if tx.send(outcome).is_err() {
            debug!("Dashboard closed before fetch completed");
        }
    });
}
