use std::time::Duration;

use futures_util::FutureExt;
use thiserror::Error;
use tokio::task::{JoinError, JoinHandle};

use crate::dispatch::{EffectDispatcher, FollowUp};
use crate::intent::{classify, Intent};
use crate::state::{Message, PendingState};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SubmitRejected {
    #[error("nothing to send")]
    Empty,
    #[error("still waiting for the previous reply")]
    Pending,
}

/// An assistant reply that has been scheduled and, once returned from
/// [`Conversation::poll_reply`], appended to the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledReply {
    pub intent: Intent,
    pub message: Message,
    pub follow_up: Option<FollowUp>,
}

/// Owns the transcript and the single in-flight reply.
pub struct Conversation {
    transcript: Vec<Message>,
    reply_delay: Duration,
    in_flight: Option<JoinHandle<ScheduledReply>>,
}

impl Conversation {
    pub fn new(greeting: impl Into<String>, reply_delay: Duration) -> Self {
        Self {
            transcript: vec![Message::assistant(greeting)],
            reply_delay,
            in_flight: None,
        }
    }

    pub fn transcript(&self) -> &[Message] {
        &self.transcript
    }

    pub fn state(&self) -> PendingState {
        if self.in_flight.is_some() {
            PendingState::Pending
        } else {
            PendingState::Idle
        }
    }

    /// Record the user's text, perform its effect and schedule the reply.
    ///
    /// Must be called from within a tokio runtime.
    pub fn submit(
        &mut self,
        text: &str,
        dispatcher: &EffectDispatcher,
    ) -> Result<Intent, SubmitRejected> {
        if self.in_flight.is_some() {
            tracing::debug!("submission rejected while a reply is pending");
            return Err(SubmitRejected::Pending);
        }
        if text.trim().is_empty() {
            tracing::debug!("empty submission rejected");
            return Err(SubmitRejected::Empty);
        }

        self.transcript.push(Message::user(text));

        let intent = classify(text);
        tracing::debug!(?intent, "classified submission");
        let follow_up = dispatcher.dispatch_intent(&intent);

        let reply = ScheduledReply {
            intent,
            message: Message::assistant(intent.reply()),
            follow_up,
        };
        let delay = self.reply_delay;
        self.in_flight = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            reply
        }));

        Ok(intent)
    }

    /// Append the scheduled reply if its delay has elapsed. Never blocks.
    pub fn poll_reply(&mut self) -> Option<ScheduledReply> {
        let handle = self.in_flight.as_mut()?;
        if !handle.is_finished() {
            return None;
        }
        let result = handle.now_or_never()?;
        self.in_flight = None;
        self.land(result)
    }

    /// Wait for the in-flight reply, if any, and append it.
    pub async fn next_reply(&mut self) -> Option<ScheduledReply> {
        let handle = self.in_flight.as_mut()?;
        let result = handle.await;
        self.in_flight = None;
        self.land(result)
    }

    fn land(&mut self, result: Result<ScheduledReply, JoinError>) -> Option<ScheduledReply> {
        match result {
            Ok(reply) => {
                self.transcript.push(reply.message.clone());
                Some(reply)
            }
            Err(err) => {
                tracing::warn!(error = %err, "scheduled reply did not complete");
                None
            }
        }
    }
}

impl Drop for Conversation {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::collaborators::AlarmKind;
    use crate::route::Route;
    use crate::state::{Role, DEFAULT_GREETING};
    use crate::testing::{Call, Recorder};

    const DELAY: Duration = Duration::from_millis(1000);

    fn setup() -> (Conversation, EffectDispatcher, Recorder) {
        let recorder = Recorder::new();
        let dispatcher = EffectDispatcher::new(recorder.collaborators(), AlarmKind::default());
        (Conversation::new(DEFAULT_GREETING, DELAY), dispatcher, recorder)
    }

    #[tokio::test(start_paused = true)]
    async fn starts_idle_with_greeting() {
        let (conversation, _, _) = setup();
        assert_eq!(conversation.state(), PendingState::Idle);
        assert_eq!(conversation.transcript(), &[Message::assistant(DEFAULT_GREETING)]);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_appends_user_then_assistant_and_returns_to_idle() {
        let (mut conversation, dispatcher, _) = setup();

        let intent = conversation.submit("take me to my profile", &dispatcher).unwrap();
        assert_eq!(intent, Intent::NavigateTo(Route::Profile));
        assert_eq!(conversation.state(), PendingState::Pending);
        assert_eq!(conversation.transcript().len(), 2);

        let reply = conversation.next_reply().await.unwrap();
        assert_eq!(reply.message, Message::assistant("Opening your profile."));
        assert_eq!(conversation.state(), PendingState::Idle);

        let roles: Vec<Role> = conversation.transcript().iter().map(|m| m.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::User, Role::Assistant]);
        assert_eq!(conversation.transcript()[1].content, "take me to my profile");
    }

    #[tokio::test(start_paused = true)]
    async fn reply_waits_for_the_delay() {
        let (mut conversation, dispatcher, _) = setup();
        conversation.submit("help", &dispatcher).unwrap();

        tokio::time::sleep(DELAY - Duration::from_millis(1)).await;
        assert_eq!(conversation.poll_reply(), None);
        assert_eq!(conversation.state(), PendingState::Pending);

        tokio::time::sleep(Duration::from_millis(2)).await;
        let reply = conversation.poll_reply().unwrap();
        assert_eq!(reply.intent, Intent::ShowHelp);
        assert_eq!(conversation.state(), PendingState::Idle);
        assert_eq!(conversation.transcript().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_while_pending_is_rejected_without_side_effects() {
        let (mut conversation, dispatcher, recorder) = setup();
        conversation.submit("open dashboard", &dispatcher).unwrap();
        let len = conversation.transcript().len();

        assert_eq!(
            conversation.submit("SOS", &dispatcher),
            Err(SubmitRejected::Pending)
        );
        assert_eq!(conversation.transcript().len(), len);
        assert_eq!(recorder.count(|call| matches!(call, Call::AlarmStart(_))), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn blank_submit_is_rejected() {
        let (mut conversation, dispatcher, recorder) = setup();
        assert_eq!(conversation.submit("  \n", &dispatcher), Err(SubmitRejected::Empty));
        assert_eq!(conversation.transcript().len(), 1);
        assert_eq!(conversation.state(), PendingState::Idle);
        assert!(recorder.calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn effect_runs_before_the_reply_lands() {
        let (mut conversation, dispatcher, recorder) = setup();
        conversation.submit("medical records", &dispatcher).unwrap();
        assert_eq!(recorder.navigations(), vec!["/medical".to_string()]);
        assert_eq!(conversation.poll_reply(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn sign_out_reply_carries_login_follow_up() {
        let (mut conversation, dispatcher, _) = setup();
        conversation.submit("sign out", &dispatcher).unwrap();
        let reply = conversation.next_reply().await.unwrap();
        assert_eq!(reply.follow_up, Some(FollowUp::Navigate(Route::Login)));
    }

    #[tokio::test(start_paused = true)]
    async fn next_reply_without_pending_is_none() {
        let (mut conversation, _, _) = setup();
        assert_eq!(conversation.next_reply().await, None);
        assert_eq!(conversation.poll_reply(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn dropping_the_conversation_aborts_the_reply() {
        let (mut conversation, dispatcher, _) = setup();
        conversation.submit("about", &dispatcher).unwrap();
        let abort = conversation
            .in_flight
            .as_ref()
            .map(|handle| handle.abort_handle())
            .unwrap();

        drop(conversation);
        for _ in 0..3 {
            tokio::task::yield_now().await;
        }
        assert!(abort.is_finished());
    }
}
