use std::sync::Arc;

use crate::collaborators::{Alarm, AlarmKind, Navigator, Notifier, Session, Toast};
use crate::intent::Intent;
use crate::registry::{Command, CommandAction, CommandTarget};
use crate::route::Route;

const SOS_TITLE: &str = "SOS Alert Triggered";
const SOS_DESCRIPTION: &str = "Emergency contacts are being notified of your situation.";
const LOG_OUT_TITLE: &str = "Logging out";
const LOG_OUT_DESCRIPTION: &str = "You are being signed out of SafeGuard";

/// The external services effects are performed through.
#[derive(Clone)]
pub struct Collaborators {
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
    pub alarm: Arc<dyn Alarm>,
    pub session: Arc<dyn Session>,
}

/// An effect that must wait until the assistant's reply has landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowUp {
    Navigate(Route),
}

pub struct EffectDispatcher {
    collaborators: Collaborators,
    alarm_kind: AlarmKind,
}

impl EffectDispatcher {
    pub fn new(collaborators: Collaborators, alarm_kind: AlarmKind) -> Self {
        Self {
            collaborators,
            alarm_kind,
        }
    }

    /// Perform the immediate effect of a classified intent. Anything that
    /// has to happen after the reply delay is handed back to the caller.
    pub fn dispatch_intent(&self, intent: &Intent) -> Option<FollowUp> {
        match intent {
            Intent::NavigateTo(route) => {
                self.navigate(*route);
                None
            }
            Intent::TriggerAlert => {
                self.raise_alert();
                None
            }
            Intent::SignOut => {
                self.end_session();
                Some(FollowUp::Navigate(Route::Login))
            }
            Intent::ShowHelp | Intent::Unresolved => None,
        }
    }

    /// Perform a picked command right away. Picks skip the reply delay.
    pub fn dispatch_command(&self, command: &Command) {
        tracing::info!(command = command.name, "dispatching picked command");
        match command.target {
            CommandTarget::Route(route) => {
                self.navigate(route);
                self.collaborators
                    .notifier
                    .notify(Toast::new("Navigating", format!("Going to {}", command.name)));
            }
            CommandTarget::Action(CommandAction::TriggerSos) => self.raise_alert(),
            CommandTarget::Action(CommandAction::LogOut) => {
                self.end_session();
                self.navigate(Route::Login);
            }
        }
    }

    pub fn perform_follow_up(&self, follow_up: FollowUp) {
        match follow_up {
            FollowUp::Navigate(route) => self.navigate(route),
        }
    }

    pub fn silence_alarm(&self) {
        tracing::info!("stopping alarm");
        self.collaborators.alarm.stop();
    }

    fn navigate(&self, route: Route) {
        tracing::info!(path = route.path(), "navigating");
        self.collaborators.navigator.navigate_to(route.path());
    }

    fn raise_alert(&self) {
        tracing::info!(kind = self.alarm_kind.as_str(), "raising SOS alert");
        if let Err(err) = self.collaborators.alarm.start(self.alarm_kind) {
            tracing::warn!(error = %err, "alarm failed to start");
        }
        self.collaborators
            .notifier
            .notify(Toast::destructive(SOS_TITLE, SOS_DESCRIPTION));
    }

    // Toast precedes sign-out and any route change.
    fn end_session(&self) {
        tracing::info!("signing out");
        self.collaborators
            .notifier
            .notify(Toast::new(LOG_OUT_TITLE, LOG_OUT_DESCRIPTION));
        self.collaborators.session.sign_out();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::collaborators::{AlarmKind, ToastVariant};
    use crate::registry::CommandRegistry;
    use crate::testing::{Call, Recorder};

    fn dispatcher(recorder: &Recorder) -> EffectDispatcher {
        EffectDispatcher::new(recorder.collaborators(), AlarmKind::PoliceSiren)
    }

    #[test]
    fn navigation_intent_navigates_once() {
        let recorder = Recorder::new();
        let follow_up = dispatcher(&recorder).dispatch_intent(&Intent::NavigateTo(Route::Profile));
        assert_eq!(follow_up, None);
        assert_eq!(recorder.calls(), vec![Call::Navigate("/profile".to_string())]);
    }

    #[test]
    fn alert_starts_alarm_and_posts_destructive_toast() {
        let recorder = Recorder::new();
        dispatcher(&recorder).dispatch_intent(&Intent::TriggerAlert);
        let calls = recorder.calls();
        assert_eq!(calls[0], Call::AlarmStart(AlarmKind::PoliceSiren));
        match &calls[1] {
            Call::Notify(toast) => {
                assert_eq!(toast.variant, ToastVariant::Destructive);
                assert_eq!(toast.title, SOS_TITLE);
            }
            other => panic!("expected toast, got {other:?}"),
        }
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn alarm_failure_still_notifies() {
        let recorder = Recorder::with_failing_alarm();
        dispatcher(&recorder).dispatch_intent(&Intent::TriggerAlert);
        assert_eq!(recorder.toasts().len(), 1);
        assert_eq!(recorder.count(|call| matches!(call, Call::AlarmStart(_))), 1);
    }

    #[test]
    fn sign_out_defers_login_navigation() {
        let recorder = Recorder::new();
        let follow_up = dispatcher(&recorder).dispatch_intent(&Intent::SignOut);
        assert_eq!(follow_up, Some(FollowUp::Navigate(Route::Login)));
        assert_eq!(
            recorder.calls(),
            vec![
                Call::Notify(Toast::new(LOG_OUT_TITLE, LOG_OUT_DESCRIPTION)),
                Call::SignOut,
            ]
        );
    }

    #[test]
    fn help_and_unresolved_do_nothing() {
        let recorder = Recorder::new();
        let dispatcher = dispatcher(&recorder);
        assert_eq!(dispatcher.dispatch_intent(&Intent::ShowHelp), None);
        assert_eq!(dispatcher.dispatch_intent(&Intent::Unresolved), None);
        assert!(recorder.calls().is_empty());
    }

    #[test]
    fn picked_log_out_notifies_signs_out_then_navigates() {
        let recorder = Recorder::new();
        let command = CommandRegistry::find("Log Out").unwrap();
        dispatcher(&recorder).dispatch_command(command);
        assert_eq!(
            recorder.calls(),
            vec![
                Call::Notify(Toast::new(LOG_OUT_TITLE, LOG_OUT_DESCRIPTION)),
                Call::SignOut,
                Call::Navigate("/login".to_string()),
            ]
        );
    }

    #[test]
    fn picked_navigation_announces_destination() {
        let recorder = Recorder::new();
        let command = CommandRegistry::find("Safety Score").unwrap();
        dispatcher(&recorder).dispatch_command(command);
        assert_eq!(
            recorder.calls(),
            vec![
                Call::Navigate("/safety-score".to_string()),
                Call::Notify(Toast::new("Navigating", "Going to Safety Score")),
            ]
        );
    }

    #[test]
    fn silence_alarm_stops_it() {
        let recorder = Recorder::new();
        dispatcher(&recorder).silence_alarm();
        assert_eq!(recorder.calls(), vec![Call::AlarmStop]);
    }
}
