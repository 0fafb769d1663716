use std::io;

use crossterm::{
    cursor::{Hide, Show},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};

use crate::error::DrillError;

pub fn ensure_interactive() -> Result<(), DrillError> {
    if io::stdin().is_tty() {
        Ok(())
    } else {
        Err(DrillError::NonInteractive)
    }
}

/// Raw mode and the alternate screen, held for as long as the guard lives.
/// Dropping it restores the terminal on every exit path.
pub struct TerminalGuard {
    _private: (),
}

impl TerminalGuard {
    pub fn acquire() -> Result<Self, DrillError> {
        enable_raw_mode()?;
        let guard = Self { _private: () };
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        log::debug!("raw mode on");
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), Show, LeaveAlternateScreen);
        let _ = disable_raw_mode();
        log::debug!("raw mode off");
    }
}
