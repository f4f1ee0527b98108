//! In-memory collaborators that record what the assistant asked of them.
//!
//! Useful for headless drivers and for tests.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use tokio::sync::mpsc::UnboundedSender;

use crate::collaborators::{
    Alarm, AlarmError, AlarmKind, GlobalInput, KeyChord, ListenerId, Navigator, Notifier, Session,
    Toast,
};
use crate::dispatch::Collaborators;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Navigate(String),
    Notify(Toast),
    AlarmStart(AlarmKind),
    AlarmStop,
    SignOut,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Records every collaborator call, in order, into one shared log.
#[derive(Clone, Default)]
pub struct Recorder {
    calls: Arc<Mutex<Vec<Call>>>,
    fail_alarm: bool,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder whose alarm always fails to start.
    pub fn with_failing_alarm() -> Self {
        Self {
            fail_alarm: true,
            ..Self::default()
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        let shared = Arc::new(self.clone());
        Collaborators {
            navigator: shared.clone(),
            notifier: shared.clone(),
            alarm: shared.clone(),
            session: shared,
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        lock(&self.calls).iter().filter(|call| predicate(call)).count()
    }

    pub fn toasts(&self) -> Vec<Toast> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                Call::Notify(toast) => Some(toast.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<String> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                Call::Navigate(path) => Some(path.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }
}

impl Navigator for Recorder {
    fn navigate_to(&self, path: &str) {
        self.record(Call::Navigate(path.to_string()));
    }
}

impl Notifier for Recorder {
    fn notify(&self, toast: Toast) {
        self.record(Call::Notify(toast));
    }
}

impl Alarm for Recorder {
    fn start(&self, kind: AlarmKind) -> Result<(), AlarmError> {
        self.record(Call::AlarmStart(kind));
        if self.fail_alarm {
            return Err(AlarmError::Unavailable("no audio device".to_string()));
        }
        Ok(())
    }

    fn stop(&self) {
        self.record(Call::AlarmStop);
    }
}

impl Session for Recorder {
    fn sign_out(&self) {
        self.record(Call::SignOut);
    }
}

/// A key event source driven by hand.
#[derive(Default)]
pub struct InMemoryInput {
    listeners: Mutex<Vec<(ListenerId, UnboundedSender<KeyChord>)>>,
    next_id: AtomicU64,
}

impl InMemoryInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&self, chord: KeyChord) {
        for (_, sender) in lock(&self.listeners).iter() {
            let _ = sender.send(chord);
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).len()
    }
}

impl GlobalInput for InMemoryInput {
    fn add_listener(&self, sender: UnboundedSender<KeyChord>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, sender));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        lock(&self.listeners).retain(|(listener, _)| *listener != id);
    }
}
