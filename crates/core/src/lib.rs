//! Command registry and key dispatch loop.
//!
//! Bind key symbols to actions, start the dispatcher, and every matching key
//! press runs its action on its own thread:
//!
//! - [`registry`]: ordered bindings with first-registered-wins lookup
//! - [`dispatcher`]: the polling thread, fire-and-forget dispatch, start/stop
//! - [`config`]: read timeout and environment overrides
//! - [`error`]: [`DispatchError`]
//!
//! The crate only emits `tracing` events; installing a subscriber is left to
//! the application.
//!
//! # Example
//!
//! ```
//! use std::sync::mpsc;
//! use std::time::Duration;
//!
//! use tui_keycmd_core::input::scripted;
//! use tui_keycmd_core::{DispatchConfig, Dispatcher};
//!
//! let (feeder, source) = scripted();
//! let config = DispatchConfig::default().with_inkey_timeout(Duration::from_millis(20));
//! let dispatcher = Dispatcher::new(source, config);
//!
//! let (tx, rx) = mpsc::channel();
//! let tx = std::sync::Mutex::new(tx);
//! dispatcher.add("hH?", move |sym: &str| {
//!     let _ = tx.lock().unwrap().send(sym.to_string());
//! }, "help");
//! dispatcher.add(["q", "KEY_ESCAPE"], dispatcher.stop_action(), "quit");
//!
//! dispatcher.start()?;
//! feeder.send_symbol("?");
//! assert_eq!(rx.recv_timeout(Duration::from_secs(2)).unwrap(), "?");
//!
//! feeder.send_symbol("KEY_ESCAPE");
//! assert!(dispatcher.wait_stopped(Duration::from_secs(2)));
//! dispatcher.stop()?;
//! # Ok::<(), tui_keycmd_core::DispatchError>(())
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod registry;

pub use tui_keycmd_input as input;
pub use tui_keycmd_types as types;

pub use config::{parse_timeout_ms, DispatchConfig, INKEY_TIMEOUT_ENV};
pub use dispatcher::{Dispatcher, LoopState, StopHandle};
pub use error::{DispatchError, Result};
pub use registry::{ActionFn, Binding, CommandRegistry, DescriptionLines, Descriptions, Symbols};
