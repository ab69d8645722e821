//! Terminal setup and small rendering helpers for the dashboard.

use std::cell::Cell;
use std::io::{self, Stdout};

use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::warn;

pub type DashboardTerminal = Terminal<CrosstermBackend<Stdout>>;

/// Owns the terminal while the dashboard runs. Raw mode and the alternate
/// screen are undone on drop, including when the loop unwinds.
pub struct TerminalGuard {
    terminal: DashboardTerminal,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        if let Err(e) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }

    pub fn terminal_mut(&mut self) -> &mut DashboardTerminal {
        &mut self.terminal
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            warn!("Failed to disable raw mode: {}", e);
        }
        if let Err(e) = execute!(self.terminal.backend_mut(), LeaveAlternateScreen) {
            warn!("Failed to leave alternate screen: {}", e);
        }
        let _ = self.terminal.show_cursor();
    }
}

/// A minimal spinner with braille frames.
#[derive(Debug, Clone)]
pub struct Spinner {
    frames: &'static [&'static str],
    index: Cell<usize>,
}

impl Default for Spinner {
    fn default() -> Self {
        Self::new()
    }
}

impl Spinner {
    pub fn new() -> Self {
        Self {
            frames: &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"],
            index: Cell::new(0),
        }
    }

    pub fn tick(&self) -> &str {
        let idx = self.index.get();
        let frame = self.frames[idx];
        self.index.set((idx + 1) % self.frames.len());
        frame
    }
}
