use std::sync::Arc;

use crate::collaborators::GlobalInput;
use crate::config::Config;
use crate::conversation::{Conversation, ScheduledReply, SubmitRejected};
use crate::dispatch::{Collaborators, EffectDispatcher};
use crate::intent::Intent;
use crate::palette::{Palette, ShortcutBinding};
use crate::registry::Command;
use crate::state::{Message, PendingState};

/// The mounted assistant overlay: palette, transcript and the dispatcher
/// both input paths share.
pub struct Assistant {
    dispatcher: EffectDispatcher,
    conversation: Conversation,
    palette: Palette,
    binding: Option<ShortcutBinding>,
}

impl Assistant {
    pub fn new(config: &Config, collaborators: Collaborators) -> Self {
        Self {
            dispatcher: EffectDispatcher::new(collaborators, config.alarm_kind),
            conversation: Conversation::new(config.greeting(), config.reply_delay()),
            palette: Palette::new(config.shortcut()),
            binding: None,
        }
    }

    /// Subscribe to the global key source. Any previous subscription is
    /// released first, so at most one listener is ever registered.
    pub fn mount(&mut self, input: Arc<dyn GlobalInput>) {
        self.binding = None;
        self.binding = Some(ShortcutBinding::bind(input));
    }

    pub fn unmount(&mut self) {
        self.binding = None;
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    pub fn transcript(&self) -> &[Message] {
        self.conversation.transcript()
    }

    pub fn pending_state(&self) -> PendingState {
        self.conversation.state()
    }

    pub fn can_submit(&self) -> bool {
        self.palette.can_submit(self.pending_state())
    }

    /// Send whatever is in the palette's input line. The line is cleared
    /// only when the submission is accepted.
    pub fn submit_input(&mut self) -> Result<Intent, SubmitRejected> {
        let text = self.palette.input().to_string();
        let intent = self.submit(&text)?;
        self.palette.clear_input();
        Ok(intent)
    }

    pub fn submit(&mut self, text: &str) -> Result<Intent, SubmitRejected> {
        self.conversation.submit(text, &self.dispatcher)
    }

    /// Run a command picked from the list, then close the palette.
    pub fn pick(&mut self, command: &Command) {
        self.dispatcher.dispatch_command(command);
        self.palette.close();
    }

    pub fn pick_selected(&mut self) -> Option<&'static Command> {
        let command = self.palette.selected_command()?;
        self.pick(command);
        Some(command)
    }

    pub fn silence_alarm(&self) {
        self.dispatcher.silence_alarm();
    }

    /// Apply pending shortcut presses and land a finished reply, performing
    /// its follow-up effect. Never blocks.
    pub fn poll(&mut self) -> Option<ScheduledReply> {
        if let Some(binding) = self.binding.as_mut() {
            self.palette.pump(binding);
        }
        let reply = self.conversation.poll_reply()?;
        self.finish(&reply);
        Some(reply)
    }

    /// Wait for the in-flight reply and perform its follow-up effect.
    pub async fn next_reply(&mut self) -> Option<ScheduledReply> {
        let reply = self.conversation.next_reply().await?;
        self.finish(&reply);
        Some(reply)
    }

    fn finish(&self, reply: &ScheduledReply) {
        if let Some(follow_up) = reply.follow_up {
            self.dispatcher.perform_follow_up(follow_up);
        }
    }
}
