//! Key mapping from terminal events to dispatcher keys.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::types::{Key, NamedKey};

/// Map any terminal event to a key press.
///
/// Resize, focus, mouse and paste events carry no key and yield `None`.
pub fn map_event(event: Event) -> Option<Key> {
    match event {
        Event::Key(key) => map_key_event(key),
        _ => None,
    }
}

/// Map a keyboard event to a [`Key`].
///
/// Release events are ignored. Ctrl plus an ASCII letter yields the matching
/// control character (`Ctrl-D` is `'\u{4}'`), the way a terminal in cbreak
/// mode would deliver it.
pub fn map_key_event(key: KeyEvent) -> Option<Key> {
    if key.kind == KeyEventKind::Release {
        return None;
    }

    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(Key::Char(control_char(c).unwrap_or(c)))
        }
        KeyCode::Char(c) => Some(Key::Char(c)),
        KeyCode::Tab => Some(Key::Char('\t')),

        KeyCode::Esc => Some(Key::Named(NamedKey::Escape)),
        KeyCode::Enter => Some(Key::Named(NamedKey::Enter)),
        KeyCode::Backspace => Some(Key::Named(NamedKey::Backspace)),
        KeyCode::Delete => Some(Key::Named(NamedKey::Delete)),
        KeyCode::Insert => Some(Key::Named(NamedKey::Insert)),

        // Navigation
        KeyCode::Up => Some(Key::Named(NamedKey::Up)),
        KeyCode::Down => Some(Key::Named(NamedKey::Down)),
        KeyCode::Left => Some(Key::Named(NamedKey::Left)),
        KeyCode::Right => Some(Key::Named(NamedKey::Right)),
        KeyCode::Home => Some(Key::Named(NamedKey::Home)),
        KeyCode::End => Some(Key::Named(NamedKey::End)),
        KeyCode::PageUp => Some(Key::Named(NamedKey::PageUp)),
        KeyCode::PageDown => Some(Key::Named(NamedKey::PageDown)),
        KeyCode::BackTab => Some(Key::Named(NamedKey::BackTab)),

        KeyCode::F(n) => Some(Key::Named(NamedKey::F(n))),

        _ => None,
    }
}

fn control_char(c: char) -> Option<char> {
    if c.is_ascii_alphabetic() {
        Some(char::from(c.to_ascii_lowercase() as u8 & 0x1f))
    } else {
        None
    }
}
