//! Dispatcher error type.

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    /// A prepared binding list contained a binding with no key symbols.
    #[error("binding #{index} has no key symbols")]
    EmptySymbols { index: usize },

    #[error("dispatcher is already running")]
    AlreadyStarted,

    #[error("dispatcher has been stopped and cannot be restarted")]
    AlreadyStopped,

    #[error("invalid {key} value {value:?}: {reason}")]
    InvalidConfig {
        key: String,
        value: String,
        reason: &'static str,
    },

    /// Reading from the terminal (or entering its input mode) failed.
    #[error("terminal input failed: {0}")]
    Io(#[from] io::Error),

    #[error("key poller thread panicked")]
    PollerPanicked,
}

pub type Result<T, E = DispatchError> = std::result::Result<T, E>;
