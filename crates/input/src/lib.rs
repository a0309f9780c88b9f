//! Terminal input source.
//!
//! This crate turns terminal events into [`Key`] values and exposes the
//! [`KeySource`] seam the dispatcher polls. It knows nothing about bindings or
//! actions.
//!
//! - [`map`]: crossterm key events to [`Key`] (named keys vs literal chars)
//! - [`mode`]: scoped raw-mode acquisition for real terminals
//! - [`source`]: the [`KeySource`] trait and the crossterm-backed source
//! - [`script`]: a channel-fed source for headless use and tests

pub mod map;
pub mod mode;
pub mod script;
pub mod source;

pub use tui_keycmd_types as types;
pub use tui_keycmd_types::{Key, NamedKey};

pub use map::{map_event, map_key_event};
pub use mode::RawModeGuard;
pub use script::{scripted, KeyFeeder, ModeProbe, ScriptedKeys, ScriptedMode};
pub use source::{KeySource, TerminalKeySource};
