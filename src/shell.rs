//! In-process stand-ins for the services the assistant drives: page
//! routing, toasts, the alarm and the login session.

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use safeguard_core::{
    Alarm, AlarmError, AlarmKind, Collaborators, Navigator, Notifier, Route, Session, Toast,
};
use tokio::task::JoinHandle;

const MAX_TOASTS: usize = 5;

#[derive(Debug, Clone)]
pub struct ShellState {
    pub route: Route,
    pub signed_in: bool,
    pub alarm: Option<AlarmKind>,
    pub toasts: VecDeque<Toast>,
}

impl Default for ShellState {
    fn default() -> Self {
        Self {
            route: Route::Main,
            signed_in: true,
            alarm: None,
            toasts: VecDeque::new(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Clone, Default)]
pub struct Shell {
    state: Arc<Mutex<ShellState>>,
}

impl Shell {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            navigator: Arc::new(ShellNavigator(self.state.clone())),
            notifier: Arc::new(ToastLog(self.state.clone())),
            alarm: Arc::new(TerminalBell::new(self.state.clone())),
            session: Arc::new(LocalSession(self.state.clone())),
        }
    }

    pub fn snapshot(&self) -> ShellState {
        lock(&self.state).clone()
    }
}

struct ShellNavigator(Arc<Mutex<ShellState>>);

impl Navigator for ShellNavigator {
    fn navigate_to(&self, path: &str) {
        match Route::from_path(path) {
            Some(route) => lock(&self.0).route = route,
            None => tracing::warn!(path, "ignoring navigation to unknown path"),
        }
    }
}

struct ToastLog(Arc<Mutex<ShellState>>);

impl Notifier for ToastLog {
    fn notify(&self, toast: Toast) {
        tracing::info!(title = %toast.title, variant = ?toast.variant, "toast");
        let mut state = lock(&self.0);
        state.toasts.push_back(toast);
        while state.toasts.len() > MAX_TOASTS {
            state.toasts.pop_front();
        }
    }
}

struct LocalSession(Arc<Mutex<ShellState>>);

impl Session for LocalSession {
    fn sign_out(&self) {
        lock(&self.0).signed_in = false;
    }
}

/// Rings the terminal bell at the alarm's cadence until stopped.
struct TerminalBell {
    state: Arc<Mutex<ShellState>>,
    ringing: Mutex<Option<JoinHandle<()>>>,
}

impl TerminalBell {
    fn new(state: Arc<Mutex<ShellState>>) -> Self {
        Self {
            state,
            ringing: Mutex::new(None),
        }
    }

    fn ring() -> io::Result<()> {
        let mut stderr = io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()
    }
}

impl Alarm for TerminalBell {
    fn start(&self, kind: AlarmKind) -> Result<(), AlarmError> {
        self.stop();

        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|err| AlarmError::Unavailable(err.to_string()))?;
        Self::ring()?;

        let handle = runtime.spawn(async move {
            let mut interval = tokio::time::interval(kind.cadence());
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(err) = Self::ring() {
                    tracing::warn!(error = %err, "alarm bell stopped ringing");
                    break;
                }
            }
        });
        *lock(&self.ringing) = Some(handle);
        lock(&self.state).alarm = Some(kind);
        Ok(())
    }

    fn stop(&self) {
        if let Some(handle) = lock(&self.ringing).take() {
            handle.abort();
        }
        lock(&self.state).alarm = None;
    }
}

impl Drop for TerminalBell {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.ringing).take() {
            handle.abort();
        }
    }
}
