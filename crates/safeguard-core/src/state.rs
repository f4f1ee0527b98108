//! UI-agnostic conversation state types
//!
//! These are shared by every front end that mounts the assistant and don't
//! depend on any specific UI framework.

use serde::{Deserialize, Serialize};

pub const DEFAULT_GREETING: &str = "Hi! I'm SafeGuard Assistant. How can I help you today?";

/// A single turn in the assistant transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// Whether an assistant reply is currently scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PendingState {
    #[default]
    Idle,
    Pending,
}

impl PendingState {
    pub fn is_pending(&self) -> bool {
        matches!(self, PendingState::Pending)
    }
}
