//! Key dispatch loop.
//!
//! A poller thread reads keys from a [`KeySource`] with a bounded wait,
//! resolves each one to a symbol, and fires the first matching binding on a
//! freshly spawned, detached thread. The poller never waits for an action, so
//! a slow action cannot delay the next key.
//!
//! Lifecycle: `Idle -> Running -> Stopped`. Stopping clears the `active` flag,
//! which the poller re-reads after every read timeout, then joins the poller.
//! In-flight actions are not cancelled.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, OnceLock, PoisonError, RwLock, Weak};
use std::sync::{RwLockReadGuard, RwLockWriteGuard};
use std::thread::{self, JoinHandle, ThreadId};
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::config::DispatchConfig;
use crate::error::{DispatchError, Result};
use crate::input::KeySource;
use crate::registry::{Binding, CommandRegistry, Descriptions, Symbols};

const POLLER_THREAD_NAME: &str = "keycmd-poller";
const ACTION_THREAD_NAME: &str = "keycmd-action";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Constructed, not started.
    Idle,
    /// Poller thread is reading keys.
    Running,
    /// Terminal; a stopped dispatcher cannot be restarted.
    Stopped,
}

type PollerHandle = JoinHandle<Result<()>>;
type Launch = Box<dyn FnOnce(Arc<Shared>) -> io::Result<PollerHandle> + Send>;

/// State shared between the dispatcher, its stop handles, and the poller.
struct Shared {
    registry: RwLock<CommandRegistry>,
    active: AtomicBool,
    state: Mutex<LoopState>,
    exited: Condvar,
    poller: Mutex<Option<PollerHandle>>,
    poller_thread: OnceLock<ThreadId>,
}

impl Shared {
    fn new(registry: CommandRegistry) -> Self {
        Self {
            registry: RwLock::new(registry),
            active: AtomicBool::new(false),
            state: Mutex::new(LoopState::Idle),
            exited: Condvar::new(),
            poller: Mutex::new(None),
            poller_thread: OnceLock::new(),
        }
    }

    fn registry(&self) -> RwLockReadGuard<'_, CommandRegistry> {
        self.registry.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn registry_mut(&self) -> RwLockWriteGuard<'_, CommandRegistry> {
        self.registry.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_state(&self) -> MutexGuard<'_, LoopState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_poller(&self) -> MutexGuard<'_, Option<PollerHandle>> {
        self.poller.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn on_poller_thread(&self) -> bool {
        self.poller_thread.get() == Some(&thread::current().id())
    }

    fn join_poller(&self) -> Result<()> {
        let Some(handle) = self.lock_poller().take() else {
            return Ok(());
        };
        match handle.join() {
            Ok(outcome) => outcome,
            Err(_) => Err(DispatchError::PollerPanicked),
        }
    }
}

/// Marks the loop stopped when the poller exits, including by panic.
struct ExitGuard<'a> {
    shared: &'a Shared,
}

impl Drop for ExitGuard<'_> {
    fn drop(&mut self) {
        self.shared.active.store(false, Ordering::Release);
        *self.shared.lock_state() = LoopState::Stopped;
        self.shared.exited.notify_all();
        debug!("key poller exited");
    }
}

/// Keyboard command dispatcher.
///
/// Owns the command registry and, once started, a poller thread holding the
/// key source. Dropping a running dispatcher stops it.
pub struct Dispatcher {
    shared: Arc<Shared>,
    config: DispatchConfig,
    launch: Mutex<Option<Launch>>,
}

impl Dispatcher {
    /// Create an idle dispatcher with an empty registry.
    pub fn new<S>(source: S, config: DispatchConfig) -> Self
    where
        S: KeySource + 'static,
    {
        Self::with_registry(source, config, CommandRegistry::new())
    }

    /// Create an idle dispatcher from a prepared binding list.
    ///
    /// Fails with [`DispatchError::EmptySymbols`] if any binding has no symbols.
    pub fn with_bindings<S>(
        source: S,
        config: DispatchConfig,
        bindings: impl IntoIterator<Item = Binding>,
    ) -> Result<Self>
    where
        S: KeySource + 'static,
    {
        let registry = CommandRegistry::with_bindings(bindings)?;
        Ok(Self::with_registry(source, config, registry))
    }

    fn with_registry<S>(source: S, config: DispatchConfig, registry: CommandRegistry) -> Self
    where
        S: KeySource + 'static,
    {
        let timeout = config.inkey_timeout;
        let launch: Launch = Box::new(move |shared: Arc<Shared>| {
            thread::Builder::new()
                .name(POLLER_THREAD_NAME.to_string())
                .spawn(move || poll_keys(source, &shared, timeout))
        });

        Self {
            shared: Arc::new(Shared::new(registry)),
            config,
            launch: Mutex::new(Some(launch)),
        }
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Register an action for one or more key symbols.
    ///
    /// A string registers each of its characters; a list registers its
    /// entries as given. Safe to call while running.
    pub fn add<F>(&self, symbols: impl Into<Symbols>, action: F, description: impl Into<String>)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.shared.registry_mut().add(symbols, action, description);
    }

    /// Help listing in registration order; also printed to stdout if `print`.
    pub fn list_descriptions(&self, print: bool) -> Descriptions {
        let descriptions = self.shared.registry().list_descriptions(false);
        if print {
            if let Err(err) = descriptions.print() {
                warn!(%err, "failed to print command help");
            }
        }
        descriptions
    }

    pub fn binding_count(&self) -> usize {
        self.shared.registry().len()
    }

    /// Spawn the poller thread.
    ///
    /// A dispatcher starts at most once: a second call fails with
    /// [`DispatchError::AlreadyStarted`], a call after stop with
    /// [`DispatchError::AlreadyStopped`].
    pub fn start(&self) -> Result<()> {
        let mut state = self.shared.lock_state();
        match *state {
            LoopState::Idle => {}
            LoopState::Running => return Err(DispatchError::AlreadyStarted),
            LoopState::Stopped => return Err(DispatchError::AlreadyStopped),
        }

        let launch = self
            .launch
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(DispatchError::AlreadyStarted)?;

        self.shared.active.store(true, Ordering::Release);
        *state = LoopState::Running;

        match launch(Arc::clone(&self.shared)) {
            Ok(handle) => {
                let _ = self.shared.poller_thread.set(handle.thread().id());
                *self.shared.lock_poller() = Some(handle);
                debug!(
                    timeout_ms = self.config.inkey_timeout.as_millis() as u64,
                    bindings = self.binding_count(),
                    "dispatcher started"
                );
                Ok(())
            }
            Err(err) => {
                self.shared.active.store(false, Ordering::Release);
                *state = LoopState::Stopped;
                Err(DispatchError::Io(err))
            }
        }
    }

    /// Stop the poller and wait for it to exit.
    ///
    /// See [`StopHandle::stop`].
    pub fn stop(&self) -> Result<()> {
        self.stop_handle().stop()
    }

    /// A cloneable handle that can stop this dispatcher from any thread.
    pub fn stop_handle(&self) -> StopHandle {
        StopHandle {
            shared: Arc::downgrade(&self.shared),
        }
    }

    /// An action that stops this dispatcher, for binding to a quit key.
    pub fn stop_action(&self) -> impl Fn(&str) + Send + Sync + 'static {
        let handle = self.stop_handle();
        move |symbol: &str| {
            debug!(key = ?symbol, "stop requested by key");
            if let Err(err) = handle.stop() {
                warn!(%err, "dispatcher stopped with an error");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.state() == LoopState::Running
    }

    pub fn state(&self) -> LoopState {
        *self.shared.lock_state()
    }

    /// Block until the loop reaches [`LoopState::Stopped`], or `timeout`
    /// elapses. Returns whether it stopped.
    ///
    /// Useful for a main thread waiting on a quit key. Does not stop the loop.
    pub fn wait_stopped(&self, timeout: Duration) -> bool {
        let state = self.shared.lock_state();
        let (state, _) = self
            .shared
            .exited
            .wait_timeout_while(state, timeout, |s| *s != LoopState::Stopped)
            .unwrap_or_else(PoisonError::into_inner);
        *state == LoopState::Stopped
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        if let Err(err) = self.stop() {
            warn!(%err, "dispatcher stopped with an error");
        }
    }
}

/// Stops a [`Dispatcher`] from any thread, including a dispatched action.
///
/// Holds a weak reference, so a handle stored in the dispatcher's own
/// registry (see [`Dispatcher::stop_action`]) does not keep it alive. Once the
/// dispatcher is gone the handle reports it as stopped.
#[derive(Clone)]
pub struct StopHandle {
    shared: Weak<Shared>,
}

impl StopHandle {
    /// Clear the `active` flag, then block until the poller has exited.
    ///
    /// Takes effect within one read timeout. Returns the poller's outcome: the
    /// terminal error that ended it, if any. When several callers stop
    /// concurrently, all of them wait, and one of them receives the outcome.
    /// Stopping an idle or already stopped dispatcher returns `Ok(())`.
    pub fn stop(&self) -> Result<()> {
        let Some(shared) = self.shared.upgrade() else {
            return Ok(());
        };

        {
            let mut state = shared.lock_state();
            // Cleared under the state lock so a concurrent `start` cannot
            // set it back after we decide to wait.
            shared.active.store(false, Ordering::Release);
            let current = *state;
            match current {
                LoopState::Idle => {
                    *state = LoopState::Stopped;
                    debug!("dispatcher stopped before start");
                    return Ok(());
                }
                LoopState::Running if shared.on_poller_thread() => {
                    // Joining here would wait on ourselves.
                    return Ok(());
                }
                LoopState::Running => {
                    debug!("stopping dispatcher");
                    while *state == LoopState::Running {
                        state = shared
                            .exited
                            .wait(state)
                            .unwrap_or_else(PoisonError::into_inner);
                    }
                }
                LoopState::Stopped => {}
            }
        }

        shared.join_poller()
    }

    pub fn is_running(&self) -> bool {
        self.shared
            .upgrade()
            .is_some_and(|shared| *shared.lock_state() == LoopState::Running)
    }
}

fn poll_keys<S: KeySource>(mut source: S, shared: &Shared, timeout: Duration) -> Result<()> {
    // Declared first so it drops last, after the input mode is released.
    let _exit = ExitGuard { shared };

    let outcome = run_polling_cycle(&mut source, shared, timeout);
    if let Err(err) = &outcome {
        error!(%err, "key poller stopped on error");
    }
    outcome
}

fn run_polling_cycle<S: KeySource>(
    source: &mut S,
    shared: &Shared,
    timeout: Duration,
) -> Result<()> {
    let _mode = source.enter_mode()?;
    debug!("polling for keys");

    while shared.active.load(Ordering::Acquire) {
        let Some(key) = source.read_key(timeout)? else {
            continue;
        };

        let symbol = key.symbol();
        debug!(key = ?symbol, named = key.is_named_sequence(), "key read");

        let binding = shared.registry().find_action(&symbol).cloned();
        match binding {
            Some(binding) => dispatch(binding, symbol.into_owned()),
            None => debug!(key = ?symbol, "unmatched key ignored"),
        }
    }

    Ok(())
}

/// Fire-and-forget: the action thread is detached.
fn dispatch(binding: Arc<Binding>, symbol: String) {
    debug!(key = ?symbol, binding = %binding, "dispatching");
    let spawned = thread::Builder::new()
        .name(ACTION_THREAD_NAME.to_string())
        .spawn(move || binding.invoke(&symbol));
    if let Err(err) = spawned {
        warn!(%err, "failed to spawn action thread");
    }
}
