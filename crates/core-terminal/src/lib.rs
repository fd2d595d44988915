//! Terminal session setup and guaranteed teardown.
//!
//! The whole interactive session runs inside a [`TerminalGuard`]: raw mode
//! and the alternate screen are acquired once, and restored on every exit
//! path — normal quit, error return, or panic unwind. The editor keeps the
//! hardware cursor visible and repositions it each frame, so enter/leave do
//! not touch cursor visibility.

use anyhow::Result;
use crossterm::{
    execute,
    terminal::{
        EnterAlternateScreen, LeaveAlternateScreen, SetTitle, disable_raw_mode, enable_raw_mode,
        size,
    },
};
use std::io::stdout;

pub trait TerminalBackend {
    fn enter(&mut self) -> Result<()>;
    fn leave(&mut self) -> Result<()>;
    fn set_title(&mut self, title: &str) -> Result<()>;
}

/// Crossterm-backed terminal session. `enter`/`leave` are idempotent so the
/// guard and a late manual `leave` cannot double-restore.
pub struct CrosstermBackend {
    entered: bool,
}

impl Default for CrosstermBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl CrosstermBackend {
    pub fn new() -> Self {
        Self { entered: false }
    }

    /// Enter raw mode + alternate screen and return a guard that restores
    /// both on drop.
    pub fn enter_guard(&mut self) -> Result<TerminalGuard<'_>> {
        self.enter()?;
        Ok(TerminalGuard { backend: self })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn enter(&mut self) -> Result<()> {
        if !self.entered {
            enable_raw_mode()?;
            execute!(stdout(), EnterAlternateScreen)?;
            self.entered = true;
        }
        Ok(())
    }

    fn leave(&mut self) -> Result<()> {
        if self.entered {
            execute!(stdout(), LeaveAlternateScreen)?;
            disable_raw_mode()?;
            self.entered = false;
        }
        Ok(())
    }

    fn set_title(&mut self, title: &str) -> Result<()> {
        execute!(stdout(), SetTitle(title))?;
        Ok(())
    }
}

impl Drop for CrosstermBackend {
    fn drop(&mut self) {
        let _ = self.leave();
    }
}

/// Restores the terminal when dropped, panics included.
pub struct TerminalGuard<'a> {
    backend: &'a mut CrosstermBackend,
}

impl Drop for TerminalGuard<'_> {
    fn drop(&mut self) {
        let _ = self.backend.leave();
    }
}

/// Current terminal dimensions as `(cols, rows)`.
pub fn screen_size() -> Result<(u16, u16)> {
    Ok(size()?)
}
