//! Submission lifecycle

use crate::auth::{Session, User};

/// Banner shown for any failed registration, whatever the cause
pub const REGISTRATION_FAILED_MESSAGE: &str = "The registration details are incorrect";

/// Result of the register-then-fetch-user chain
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SubmissionOutcome {
    #[default]
    Idle,
    InFlight,
    Succeeded { session: Session, user: User },
    Failed(String),
}

impl SubmissionOutcome {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    /// Terminal states end a submission attempt
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded { .. } | Self::Failed(_))
    }
}
