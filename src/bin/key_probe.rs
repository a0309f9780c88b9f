//! Print the symbol of every key press.
//!
//! Handy for finding the name to bind (`KEY_PGUP`, `"\u{4}"`, ...).
//! Escape or `q` exits.

use std::io::{self, Write};
use std::time::Duration;

use anyhow::Result;

use tui_keycmd::input::{KeySource, TerminalKeySource};
use tui_keycmd::types::{Key, NamedKey, DEFAULT_INKEY_TIMEOUT_MS};

fn main() -> Result<()> {
    let mut source = TerminalKeySource::new();
    let _mode = source.enter_mode()?;
    let timeout = Duration::from_millis(DEFAULT_INKEY_TIMEOUT_MS);

    let mut out = io::stdout();
    write!(out, "press keys (Escape or q quits)\r\n")?;
    out.flush()?;

    loop {
        let Some(key) = source.read_key(timeout)? else {
            continue;
        };
        let kind = if key.is_named_sequence() { "named" } else { "char" };
        write!(out, "{kind:<5} {key}\r\n")?;
        out.flush()?;

        if matches!(key, Key::Named(NamedKey::Escape) | Key::Char('q')) {
            return Ok(());
        }
    }
}
