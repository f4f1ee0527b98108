pub mod assistant;
pub mod collaborators;
pub mod config;
pub mod conversation;
pub mod dispatch;
pub mod intent;
pub mod palette;
pub mod registry;
pub mod route;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

// Re-export main types for convenience
pub use assistant::Assistant;
pub use collaborators::{
    Alarm, AlarmError, AlarmKind, GlobalInput, KeyChord, ListenerId, Navigator, Notifier, Session,
    Toast, ToastVariant,
};
pub use config::{Config, ConfigError};
pub use conversation::{Conversation, ScheduledReply, SubmitRejected};
pub use dispatch::{Collaborators, EffectDispatcher, FollowUp};
pub use intent::{classify, Intent};
pub use palette::{Palette, Shortcut, ShortcutBinding};
pub use registry::{Command, CommandAction, CommandKind, CommandRegistry, CommandTarget};
pub use route::Route;
pub use state::{Message, PendingState, Role};
