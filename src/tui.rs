use std::io::{self, Stderr};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use futures_util::StreamExt;
use ratatui::{backend::CrosstermBackend, Terminal};
use safeguard_core::{GlobalInput, KeyChord, ListenerId};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub type Tui = Terminal<CrosstermBackend<Stderr>>;

const TICK_RATE: Duration = Duration::from_millis(100);

#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
    Tick,
}

/// Convert a crossterm key press into a toolkit-neutral chord.
pub fn key_chord(key: &KeyEvent) -> Option<KeyChord> {
    match key.code {
        KeyCode::Char(c) => Some(KeyChord {
            key: c,
            control: key.modifiers.contains(KeyModifiers::CONTROL),
            super_key: key.modifiers.contains(KeyModifiers::SUPER),
            alt: key.modifiers.contains(KeyModifiers::ALT),
        }),
        _ => None,
    }
}

type Listeners = Mutex<Vec<(ListenerId, mpsc::UnboundedSender<KeyChord>)>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Terminal-wide key source. Every key press read by the [`EventHandler`]
/// is offered to the registered listeners.
#[derive(Default)]
pub struct TerminalInput {
    listeners: Listeners,
    next_id: AtomicU64,
}

impl TerminalInput {
    fn broadcast(&self, chord: KeyChord) {
        lock(&self.listeners).retain(|(_, sender)| sender.send(chord).is_ok());
    }
}

impl GlobalInput for TerminalInput {
    fn add_listener(&self, sender: mpsc::UnboundedSender<KeyChord>) -> ListenerId {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        lock(&self.listeners).push((id, sender));
        id
    }

    fn remove_listener(&self, id: ListenerId) {
        lock(&self.listeners).retain(|(listener, _)| *listener != id);
    }
}

pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tasks: Vec<JoinHandle<()>>,
}

impl EventHandler {
    pub fn new(input: Arc<TerminalInput>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        // Spawn event reader task
        let tx_events = tx.clone();
        let reader = tokio::spawn(async move {
            let mut reader = event::EventStream::new();
            while let Some(evt) = reader.next().await {
                let app_event = match evt {
                    // Only handle key press events, not release
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                        if let Some(chord) = key_chord(&key) {
                            input.broadcast(chord);
                        }
                        Some(AppEvent::Key(key))
                    }
                    Ok(Event::Mouse(mouse)) => Some(AppEvent::Mouse(mouse)),
                    Ok(Event::Resize(w, h)) => Some(AppEvent::Resize(w, h)),
                    Ok(_) => None,
                    Err(err) => {
                        tracing::warn!(error = %err, "terminal event stream error");
                        None
                    }
                };

                if let Some(event) = app_event {
                    if tx_events.send(event).is_err() {
                        break;
                    }
                }
            }
        });

        // Tick drives reply delivery and the thinking animation
        let tx_tick = tx;
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(TICK_RATE);
            loop {
                interval.tick().await;
                if tx_tick.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        });

        Self {
            rx,
            tasks: vec![reader, ticker],
        }
    }

    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }
}

impl Drop for EventHandler {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

pub fn init() -> Result<Tui> {
    enable_raw_mode()?;
    execute!(io::stderr(), EnterAlternateScreen, EnableMouseCapture)?;
    Ok(Terminal::new(CrosstermBackend::new(io::stderr()))?)
}

pub fn restore() -> Result<()> {
    execute!(io::stderr(), DisableMouseCapture, LeaveAlternateScreen)?;
    disable_raw_mode()?;
    Ok(())
}

/// Restore the terminal before the default panic output is printed.
pub fn install_panic_hook() {
    let previous_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore();
        previous_hook(panic_info);
    }));
}
