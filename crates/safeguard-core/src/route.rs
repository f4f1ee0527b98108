/// A page of the application the assistant can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Main,
    Profile,
    TrustedContacts,
    EmergencyContacts,
    SafetyScore,
    MedicalInfo,
    About,
    SelfDefense,
    Login,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::Main => "/main",
            Route::Profile => "/profile",
            Route::TrustedContacts => "/contacts",
            Route::EmergencyContacts => "/emergency",
            Route::SafetyScore => "/safety-score",
            Route::MedicalInfo => "/medical",
            Route::About => "/about",
            Route::SelfDefense => "/self-defense",
            Route::Login => "/login",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Route::all().into_iter().find(|route| route.path() == path)
    }

    pub fn all() -> Vec<Route> {
        vec![
            Route::Main,
            Route::Profile,
            Route::TrustedContacts,
            Route::EmergencyContacts,
            Route::SafetyScore,
            Route::MedicalInfo,
            Route::About,
            Route::SelfDefense,
            Route::Login,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Route::Main => "Home",
            Route::Profile => "Profile",
            Route::TrustedContacts => "Trusted Contacts",
            Route::EmergencyContacts => "Emergency Contacts",
            Route::SafetyScore => "Safety Score",
            Route::MedicalInfo => "Medical Information",
            Route::About => "About",
            Route::SelfDefense => "Self Defense",
            Route::Login => "Login",
        }
    }

    /// Pages that require a signed-in session.
    pub fn is_protected(&self) -> bool {
        !matches!(self, Route::Login)
    }
}
