//! Contracts for the services the assistant drives but does not own.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;

/// Route change by opaque path. Fire-and-forget.
pub trait Navigator {
    fn navigate_to(&self, path: &str);
}

/// User-visible toast.
pub trait Notifier {
    fn notify(&self, toast: Toast);
}

/// Audible alert. `start` may fail (no audio device, closed terminal) and
/// callers are expected to log and carry on.
pub trait Alarm {
    fn start(&self, kind: AlarmKind) -> Result<(), AlarmError>;
    fn stop(&self);
}

/// Authenticated session. `sign_out` must be idempotent.
pub trait Session {
    fn sign_out(&self);
}

/// Document-level key event source.
pub trait GlobalInput {
    fn add_listener(&self, sender: UnboundedSender<KeyChord>) -> ListenerId;
    fn remove_listener(&self, id: ListenerId);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToastVariant {
    #[default]
    Default,
    Destructive,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub description: String,
    pub variant: ToastVariant,
}

impl Toast {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: ToastVariant::Default,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            variant: ToastVariant::Destructive,
            ..Self::new(title, description)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AlarmKind {
    #[default]
    EmergencySiren,
    PoliceSiren,
    StandardAlarm,
}

impl AlarmKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmKind::EmergencySiren => "emergency-siren",
            AlarmKind::PoliceSiren => "police-siren",
            AlarmKind::StandardAlarm => "standard-alarm",
        }
    }

    /// How often an alarm of this kind repeats its tone.
    pub fn cadence(&self) -> Duration {
        match self {
            AlarmKind::EmergencySiren => Duration::from_millis(250),
            AlarmKind::PoliceSiren => Duration::from_millis(400),
            AlarmKind::StandardAlarm => Duration::from_millis(500),
        }
    }
}

#[derive(Debug, Error)]
pub enum AlarmError {
    #[error("audio output unavailable: {0}")]
    Unavailable(String),
    #[error("failed to play alarm: {0}")]
    Playback(#[from] std::io::Error),
}

/// A key press, independent of the UI toolkit that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyChord {
    pub key: char,
    pub control: bool,
    pub super_key: bool,
    pub alt: bool,
}

impl KeyChord {
    pub fn plain(key: char) -> Self {
        Self {
            key,
            control: false,
            super_key: false,
            alt: false,
        }
    }

    pub fn ctrl(key: char) -> Self {
        Self {
            control: true,
            ..Self::plain(key)
        }
    }

    pub fn super_key(key: char) -> Self {
        Self {
            super_key: true,
            ..Self::plain(key)
        }
    }
}
