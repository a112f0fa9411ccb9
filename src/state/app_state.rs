//! Application state definitions

/// Current view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Register,
    /// Sign-in screen owned by the shell; Cancel lands here
    Login,
    /// Shown once a user is signed in
    Dashboard,
}

impl View {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Register => "Registro",
            Self::Login => "Login",
            Self::Dashboard => "Dashboard",
        }
    }
}

/// Shell state around the registration form
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub current_view: View,
    /// Transient footer message, cleared on the next key press
    pub status_message: Option<String>,
}
