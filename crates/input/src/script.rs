//! Channel-fed key source.
//!
//! Drives a dispatcher without a terminal: keys pushed through a
//! [`KeyFeeder`] come out of [`ScriptedKeys::read_key`] in order. The input
//! mode is simulated and observable through a [`ModeProbe`].

use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::source::KeySource;
use crate::types::Key;

enum Scripted {
    Key(Key),
    Fail(io::ErrorKind, String),
}

/// Create a connected feeder/source pair.
pub fn scripted() -> (KeyFeeder, ScriptedKeys) {
    let (tx, rx) = mpsc::channel();
    let probe = ModeProbe::default();
    (KeyFeeder { tx }, ScriptedKeys { rx, probe })
}

/// Sending half: pushes keys (or a read failure) to the source.
#[derive(Clone)]
pub struct KeyFeeder {
    tx: Sender<Scripted>,
}

impl KeyFeeder {
    /// Queue a key. Returns `false` once the source has been dropped.
    pub fn send(&self, key: Key) -> bool {
        self.tx.send(Scripted::Key(key)).is_ok()
    }

    /// Queue a key given by its symbol (`"a"`, `"KEY_ESCAPE"`).
    ///
    /// Returns `false` for an unknown symbol or a dropped source.
    pub fn send_symbol(&self, symbol: &str) -> bool {
        match Key::from_symbol(symbol) {
            Some(key) => self.send(key),
            None => false,
        }
    }

    /// Make the next read fail with the given error.
    pub fn fail(&self, kind: io::ErrorKind, message: impl Into<String>) -> bool {
        self.tx.send(Scripted::Fail(kind, message.into())).is_ok()
    }
}

/// Observes the simulated input mode of a [`ScriptedKeys`] source.
#[derive(Debug, Clone, Default)]
pub struct ModeProbe {
    active: Arc<AtomicBool>,
    entered: Arc<AtomicUsize>,
}

impl ModeProbe {
    /// Whether a mode guard is currently alive.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// How many times the mode has been entered.
    pub fn times_entered(&self) -> usize {
        self.entered.load(Ordering::Acquire)
    }
}

/// Simulated input-mode guard; clears the probe on drop.
#[derive(Debug)]
pub struct ScriptedMode {
    active: Arc<AtomicBool>,
}

impl Drop for ScriptedMode {
    fn drop(&mut self) {
        self.active.store(false, Ordering::Release);
    }
}

/// Receiving half: a [`KeySource`] backed by a channel.
pub struct ScriptedKeys {
    rx: Receiver<Scripted>,
    probe: ModeProbe,
}

impl ScriptedKeys {
    pub fn probe(&self) -> ModeProbe {
        self.probe.clone()
    }
}

impl KeySource for ScriptedKeys {
    type Mode = ScriptedMode;

    fn enter_mode(&mut self) -> io::Result<Self::Mode> {
        self.probe.entered.fetch_add(1, Ordering::AcqRel);
        self.probe.active.store(true, Ordering::Release);
        Ok(ScriptedMode {
            active: Arc::clone(&self.probe.active),
        })
    }

    fn read_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        match self.rx.recv_timeout(timeout) {
            Ok(Scripted::Key(key)) => Ok(Some(key)),
            Ok(Scripted::Fail(kind, message)) => Err(io::Error::new(kind, message)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => {
                // No feeder left: behave like an idle terminal.
                thread::sleep(timeout);
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::NamedKey;

    #[test]
    fn test_keys_come_out_in_order() {
        let (feeder, mut source) = scripted();
        assert!(feeder.send(Key::Char('a')));
        assert!(feeder.send_symbol("KEY_ESCAPE"));

        let timeout = Duration::from_millis(10);
        assert_eq!(source.read_key(timeout).unwrap(), Some(Key::Char('a')));
        assert_eq!(
            source.read_key(timeout).unwrap(),
            Some(Key::Named(NamedKey::Escape))
        );
        assert_eq!(source.read_key(timeout).unwrap(), None);
    }

    #[test]
    fn test_unknown_symbol_is_rejected() {
        let (feeder, _source) = scripted();
        assert!(!feeder.send_symbol("KEY_NOPE"));
        assert!(!feeder.send_symbol("ab"));
    }

    #[test]
    fn test_failure_is_reported_as_io_error() {
        let (feeder, mut source) = scripted();
        feeder.fail(io::ErrorKind::BrokenPipe, "tty gone");
        let err = source.read_key(Duration::from_millis(10)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn test_mode_guard_is_scoped() {
        let (_feeder, mut source) = scripted();
        let probe = source.probe();
        assert!(!probe.is_active());
        {
            let _mode = source.enter_mode().unwrap();
            assert!(probe.is_active());
        }
        assert!(!probe.is_active());
        assert_eq!(probe.times_entered(), 1);
    }

    #[test]
    fn test_dropped_feeder_reads_as_timeout() {
        let (feeder, mut source) = scripted();
        drop(feeder);
        assert_eq!(source.read_key(Duration::from_millis(5)).unwrap(), None);
    }
}
