//! The input-source seam polled by the dispatcher.

use std::io;
use std::time::Duration;

use crossterm::event;

use crate::map::map_event;
use crate::mode::RawModeGuard;
use crate::types::Key;

/// Something that yields key presses with a bounded wait.
///
/// The poller calls [`KeySource::enter_mode`] once before its first read and
/// keeps the returned guard alive for the whole polling cycle; dropping the
/// guard must restore whatever input mode was active before.
pub trait KeySource: Send {
    /// Guard for the acquired input mode.
    type Mode;

    fn enter_mode(&mut self) -> io::Result<Self::Mode>;

    /// Wait up to `timeout` for the next key press.
    ///
    /// `Ok(None)` means the wait elapsed (or a non-key event arrived).
    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;
}

/// Reads keys from the controlling terminal via crossterm.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalKeySource;

impl TerminalKeySource {
    pub fn new() -> Self {
        Self
    }
}

impl KeySource for TerminalKeySource {
    type Mode = RawModeGuard;

    fn enter_mode(&mut self) -> io::Result<Self::Mode> {
        RawModeGuard::enter()
    }

    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(map_event(event::read()?))
    }
}
