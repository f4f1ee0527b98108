//! Rule-based intent classification
//!
//! Text is matched against ordered keyword groups and the first group that
//! matches wins. The order is observable: "emergency" is both a navigation
//! keyword and an alert keyword, and the navigation rule must be checked
//! first so that the word alone never sounds the alarm.

use crate::route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    NavigateTo(Route),
    TriggerAlert,
    SignOut,
    ShowHelp,
    Unresolved,
}

pub const HELP_REPLY: &str = "I can help you navigate the app or perform quick actions. \
Try asking me to open a specific page like 'open my profile', 'show emergency contacts', \
'show self defense videos', or actions like 'trigger SOS alert'.";

pub const UNRESOLVED_REPLY: &str =
    "I'm not sure how to help with that. Try asking about safety features or navigation options.";

impl Intent {
    /// The assistant's answer once this intent has been handled.
    pub fn reply(&self) -> &'static str {
        match self {
            Intent::NavigateTo(route) => match route {
                Route::Main => "Taking you to the home screen.",
                Route::Profile => "Opening your profile.",
                Route::TrustedContacts => "Taking you to trusted contacts.",
                Route::EmergencyContacts => "Opening emergency contacts.",
                Route::SafetyScore => "Checking your safety score.",
                Route::MedicalInfo => "Opening your medical information.",
                Route::About => "Opening about page.",
                Route::SelfDefense => "Opening self-defense videos.",
                Route::Login => "Taking you to the login screen.",
            },
            Intent::TriggerAlert => {
                "SOS alert triggered! Emergency contacts are being notified of your situation."
            }
            Intent::SignOut => "Logging you out of SafeGuard.",
            Intent::ShowHelp => HELP_REPLY,
            Intent::Unresolved => UNRESOLVED_REPLY,
        }
    }
}

struct KeywordRule {
    any_of: &'static [&'static str],
    none_of: &'static [&'static str],
    intent: Intent,
}

impl KeywordRule {
    fn matches(&self, text: &str) -> bool {
        self.any_of.iter().any(|keyword| text.contains(keyword))
            && !self.none_of.iter().any(|keyword| text.contains(keyword))
    }
}

const fn rule(any_of: &'static [&'static str], intent: Intent) -> KeywordRule {
    KeywordRule {
        any_of,
        none_of: &[],
        intent,
    }
}

const NAVIGATION_RULES: [KeywordRule; 8] = [
    rule(&["home", "main", "dashboard"], Intent::NavigateTo(Route::Main)),
    rule(&["profile", "account"], Intent::NavigateTo(Route::Profile)),
    KeywordRule {
        any_of: &["contacts"],
        none_of: &["emergency"],
        intent: Intent::NavigateTo(Route::TrustedContacts),
    },
    rule(&["emergency", "help number"], Intent::NavigateTo(Route::EmergencyContacts)),
    rule(&["score", "achievement"], Intent::NavigateTo(Route::SafetyScore)),
    rule(&["medical", "health", "doctor"], Intent::NavigateTo(Route::MedicalInfo)),
    rule(&["about", "app info"], Intent::NavigateTo(Route::About)),
    rule(
        &["self defense", "defense videos", "videos"],
        Intent::NavigateTo(Route::SelfDefense),
    ),
];

// Checked only after every navigation rule missed.
const ACTION_RULES: [KeywordRule; 3] = [
    rule(&["sos", "emergency", "help me"], Intent::TriggerAlert),
    rule(&["log out", "sign out"], Intent::SignOut),
    rule(&["help", "what can you do"], Intent::ShowHelp),
];

pub fn classify(text: &str) -> Intent {
    let text = text.trim().to_lowercase();
    if text.is_empty() {
        return Intent::Unresolved;
    }

    NAVIGATION_RULES
        .iter()
        .chain(ACTION_RULES.iter())
        .find(|rule| rule.matches(&text))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Unresolved)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn home_keywords_go_to_main() {
        for text in ["home", "Go HOME please", "main screen", "open the dashboard"] {
            assert_eq!(classify(text), Intent::NavigateTo(Route::Main), "{text}");
        }
    }

    #[test]
    fn emergency_never_triggers_the_alarm() {
        for text in ["emergency", "EMERGENCY!", "sos emergency", "emergency help me", "emergency contacts"] {
            assert_eq!(
                classify(text),
                Intent::NavigateTo(Route::EmergencyContacts),
                "{text}"
            );
        }
    }

    #[test]
    fn contacts_without_emergency_are_trusted_contacts() {
        assert_eq!(classify("show my contacts"), Intent::NavigateTo(Route::TrustedContacts));
    }

    #[test]
    fn help_me_alerts_but_help_informs() {
        assert_eq!(classify("help me"), Intent::TriggerAlert);
        assert_eq!(classify("help"), Intent::ShowHelp);
        assert_eq!(classify("What can you do?"), Intent::ShowHelp);
        assert_eq!(classify("call the help number"), Intent::NavigateTo(Route::EmergencyContacts));
    }

    #[test]
    fn sos_is_an_alert() {
        assert_eq!(classify("SOS please help"), Intent::TriggerAlert);
    }

    #[test]
    fn sign_out_phrases() {
        assert_eq!(classify("log out"), Intent::SignOut);
        assert_eq!(classify("please sign out now"), Intent::SignOut);
        assert_eq!(classify("logout"), Intent::Unresolved);
    }

    #[test]
    fn earlier_navigation_groups_win() {
        // "account" beats "health"; "main" beats "videos"
        assert_eq!(classify("my health account"), Intent::NavigateTo(Route::Profile));
        assert_eq!(classify("main videos"), Intent::NavigateTo(Route::Main));
        // "self defense" contains no earlier keyword
        assert_eq!(classify("self defense"), Intent::NavigateTo(Route::SelfDefense));
        assert_eq!(classify("what about this app"), Intent::NavigateTo(Route::About));
    }

    #[test]
    fn blank_and_unknown_text_is_unresolved() {
        assert_eq!(classify(""), Intent::Unresolved);
        assert_eq!(classify("   \t\n"), Intent::Unresolved);
        assert_eq!(classify("tell me a joke"), Intent::Unresolved);
    }

    #[test]
    fn replies_are_fixed_per_intent() {
        assert_eq!(Intent::NavigateTo(Route::Profile).reply(), "Opening your profile.");
        assert_eq!(Intent::Unresolved.reply(), UNRESOLVED_REPLY);
    }
}
