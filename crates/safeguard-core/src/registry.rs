use crate::route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Navigation,
    Action,
}

impl CommandKind {
    pub fn heading(&self) -> &'static str {
        match self {
            CommandKind::Navigation => "Navigation",
            CommandKind::Action => "Actions",
        }
    }
}

/// Side effect bound to an action command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandAction {
    TriggerSos,
    LogOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTarget {
    Route(Route),
    Action(CommandAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub name: &'static str,
    pub description: &'static str,
    pub target: CommandTarget,
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self.target {
            CommandTarget::Route(_) => CommandKind::Navigation,
            CommandTarget::Action(_) => CommandKind::Action,
        }
    }

    pub fn route(&self) -> Option<Route> {
        match self.target {
            CommandTarget::Route(route) => Some(route),
            CommandTarget::Action(_) => None,
        }
    }

    fn matches_query(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query) || self.description.to_lowercase().contains(query)
    }
}

const fn navigation(name: &'static str, description: &'static str, route: Route) -> Command {
    Command {
        name,
        description,
        target: CommandTarget::Route(route),
    }
}

const fn action(name: &'static str, description: &'static str, action: CommandAction) -> Command {
    Command {
        name,
        description,
        target: CommandTarget::Action(action),
    }
}

const COMMANDS: [Command; 10] = [
    navigation("Home", "Go to the main screen", Route::Main),
    navigation("Profile", "View and edit your profile", Route::Profile),
    navigation("Trusted Contacts", "Manage your trusted contacts", Route::TrustedContacts),
    navigation("Emergency Contacts", "View emergency contact numbers", Route::EmergencyContacts),
    navigation("Safety Score", "Check your personal safety score", Route::SafetyScore),
    navigation("Medical Information", "Manage your medical information", Route::MedicalInfo),
    navigation("About", "About the SafeGuard app", Route::About),
    navigation("Self Defense", "Watch self-defense videos", Route::SelfDefense),
    action("Trigger SOS", "Send emergency alert to trusted contacts", CommandAction::TriggerSos),
    action("Log Out", "Sign out of your account", CommandAction::LogOut),
];

/// Read-only catalog of the commands the palette offers.
pub struct CommandRegistry;

impl CommandRegistry {
    pub fn list() -> &'static [Command] {
        &COMMANDS
    }

    pub fn filter<P>(predicate: P) -> Vec<&'static Command>
    where
        P: Fn(&Command) -> bool,
    {
        COMMANDS.iter().filter(|command| predicate(command)).collect()
    }

    pub fn of_kind(kind: CommandKind) -> Vec<&'static Command> {
        Self::filter(|command| command.kind() == kind)
    }

    pub fn find(name: &str) -> Option<&'static Command> {
        let name = name.trim();
        COMMANDS
            .iter()
            .find(|command| command.name.eq_ignore_ascii_case(name))
    }

    /// Commands whose name or description contains `query`, in catalog order.
    pub fn search(query: &str) -> Vec<&'static Command> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return COMMANDS.iter().collect();
        }
        Self::filter(|command| command.matches_query(&query))
    }
}
