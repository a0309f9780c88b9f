//! Scoped raw-mode acquisition.
//!
//! Raw mode gives character-at-a-time input with no echo and no line
//! buffering. The guard restores the previous mode when dropped, so every exit
//! path out of a polling loop (return, `?`, panic unwinding) leaves the
//! terminal usable.

use std::io;

use crossterm::terminal;

/// Holds the terminal in raw mode until dropped.
#[derive(Debug)]
pub struct RawModeGuard {
    was_enabled: bool,
}

impl RawModeGuard {
    /// Enter raw mode.
    ///
    /// If the terminal is already raw (e.g. a host application entered it),
    /// the guard leaves it raw on drop.
    pub fn enter() -> io::Result<Self> {
        let was_enabled = terminal::is_raw_mode_enabled()?;
        if !was_enabled {
            terminal::enable_raw_mode()?;
        }
        tracing::debug!(was_enabled, "raw mode entered");
        Ok(Self { was_enabled })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        if self.was_enabled {
            return;
        }
        match terminal::disable_raw_mode() {
            Ok(()) => tracing::debug!("raw mode released"),
            Err(err) => tracing::warn!(%err, "failed to leave raw mode"),
        }
    }
}
