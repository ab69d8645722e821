//! Minimal event loop wrapper around crossterm polling.

use std::time::Duration;

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Input(KeyEvent),
    Resize,
    Tick,
    Other,
}

/// Key releases and repeats are dropped; only presses reach the app.
pub fn map_event(ev: CrosstermEvent) -> AppEvent {
    match ev {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => AppEvent::Input(key),
        CrosstermEvent::Resize(_, _) => AppEvent::Resize,
        _ => AppEvent::Other,
    }
}

/// Poll for a terminal event; returns Tick when the timeout expires.
pub fn poll_event(timeout: Duration) -> anyhow::Result<AppEvent> {
    if event::poll(timeout)? {
        let ev = event::read()?;
        Ok(map_event(ev))
    } else {
        Ok(AppEvent::Tick)
    }
}
