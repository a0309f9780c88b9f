//! Core types module - shared key model and constants
//!
//! This crate defines the key representation shared by the terminal input
//! source and the dispatcher. All types are pure data with no external
//! dependencies, so they can be used from the input layer, the registry, or
//! a headless test harness alike.
//!
//! # Key symbols
//!
//! Bindings match on *key symbols*: plain strings that are either
//!
//! - a single literal character (`"q"`, `"あ"`, `"\u{4}"` for Ctrl-D), or
//! - the canonical name of a special key (`"KEY_ESCAPE"`, `"KEY_UP"`, ...).
//!
//! Names follow the curses/terminfo convention so existing key tables carry
//! over unchanged.
//!
//! | Key | Symbol |
//! |-----|--------|
//! | Escape | `KEY_ESCAPE` |
//! | Enter | `KEY_ENTER` |
//! | Backspace | `KEY_BACKSPACE` |
//! | Arrows | `KEY_UP`, `KEY_DOWN`, `KEY_LEFT`, `KEY_RIGHT` |
//! | Paging | `KEY_PGUP`, `KEY_PGDOWN`, `KEY_HOME`, `KEY_END` |
//! | Shift-Tab | `KEY_BTAB` |
//! | Function keys | `KEY_F1` .. `KEY_F12` |
//!
//! Tab is delivered as the literal `"\t"`.
//!
//! # Timing Constants
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_INKEY_TIMEOUT_MS` | 200 | Bounded wait per key read; upper bound on stop latency |
//!
//! # Examples
//!
//! ```
//! use tui_keycmd_types::{Key, NamedKey};
//!
//! let esc = Key::Named(NamedKey::Escape);
//! assert!(esc.is_named_sequence());
//! assert_eq!(esc.symbol(), "KEY_ESCAPE");
//!
//! let q = Key::Char('q');
//! assert!(!q.is_named_sequence());
//! assert_eq!(q.symbol(), "q");
//! ```

use std::borrow::Cow;
use std::fmt;

/// Default bounded wait for one key read, in milliseconds.
pub const DEFAULT_INKEY_TIMEOUT_MS: u64 = 200;

/// Special keys that arrive as escape sequences rather than literal characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Escape,
    Enter,
    Backspace,
    Delete,
    Insert,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    BackTab,
    /// Function key `F1`..`F12`. Other numbers have no canonical name.
    F(u8),
}

const F_KEY_NAMES: [&str; 12] = [
    "KEY_F1", "KEY_F2", "KEY_F3", "KEY_F4", "KEY_F5", "KEY_F6", "KEY_F7", "KEY_F8", "KEY_F9",
    "KEY_F10", "KEY_F11", "KEY_F12",
];

impl NamedKey {
    /// Canonical symbol name, e.g. `"KEY_ESCAPE"`.
    ///
    /// Function keys outside `F1..=F12` return `None`.
    pub fn name(self) -> Option<&'static str> {
        let name = match self {
            NamedKey::Escape => "KEY_ESCAPE",
            NamedKey::Enter => "KEY_ENTER",
            NamedKey::Backspace => "KEY_BACKSPACE",
            NamedKey::Delete => "KEY_DELETE",
            NamedKey::Insert => "KEY_INSERT",
            NamedKey::Up => "KEY_UP",
            NamedKey::Down => "KEY_DOWN",
            NamedKey::Left => "KEY_LEFT",
            NamedKey::Right => "KEY_RIGHT",
            NamedKey::Home => "KEY_HOME",
            NamedKey::End => "KEY_END",
            NamedKey::PageUp => "KEY_PGUP",
            NamedKey::PageDown => "KEY_PGDOWN",
            NamedKey::BackTab => "KEY_BTAB",
            NamedKey::F(n) => return F_KEY_NAMES.get(usize::from(n).checked_sub(1)?).copied(),
        };
        Some(name)
    }

    /// Parse a canonical symbol name back into a key.
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name {
            "KEY_ESCAPE" => NamedKey::Escape,
            "KEY_ENTER" => NamedKey::Enter,
            "KEY_BACKSPACE" => NamedKey::Backspace,
            "KEY_DELETE" => NamedKey::Delete,
            "KEY_INSERT" => NamedKey::Insert,
            "KEY_UP" => NamedKey::Up,
            "KEY_DOWN" => NamedKey::Down,
            "KEY_LEFT" => NamedKey::Left,
            "KEY_RIGHT" => NamedKey::Right,
            "KEY_HOME" => NamedKey::Home,
            "KEY_END" => NamedKey::End,
            "KEY_PGUP" => NamedKey::PageUp,
            "KEY_PGDOWN" => NamedKey::PageDown,
            "KEY_BTAB" => NamedKey::BackTab,
            other => {
                let idx = F_KEY_NAMES.iter().position(|n| *n == other)?;
                NamedKey::F(idx as u8 + 1)
            }
        };
        Some(key)
    }
}

/// One key press, already classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// A literal character (including control characters such as `'\u{4}'`).
    Char(char),
    /// A special key delivered as a terminal escape sequence.
    Named(NamedKey),
}

impl Key {
    /// Whether the key arrived as a named escape sequence.
    pub fn is_named_sequence(&self) -> bool {
        matches!(self, Key::Named(_))
    }

    /// Resolve the key to the symbol used for binding lookup.
    ///
    /// Named keys without a canonical name fall back to their debug form
    /// (e.g. `"F(13)"`), which no sensible binding matches.
    pub fn symbol(&self) -> Cow<'static, str> {
        match self {
            Key::Char(c) => Cow::Owned(c.to_string()),
            Key::Named(named) => match named.name() {
                Some(name) => Cow::Borrowed(name),
                None => Cow::Owned(format!("{named:?}")),
            },
        }
    }

    /// Inverse of [`Key::symbol`]: a one-character string or a canonical name.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let mut chars = symbol.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Key::Char(c)),
            _ => NamedKey::from_name(symbol).map(Key::Named),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.symbol())
    }
}
