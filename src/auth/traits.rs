//! Trait abstraction for the auth client to enable mocking in tests

use super::{AuthError, Session, User};
use crate::state::CountryCode;
use async_trait::async_trait;

/// Remote operations the registration form depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthClientTrait: Send + Sync {
    /// Register a new account, returning its session
    #[allow(clippy::too_many_arguments)]
    async fn register(
        &self,
        email: &str,
        full_name: &str,
        last_name: &str,
        password: &str,
        password_confirmation: &str,
        country_code: CountryCode,
        mobile_number: &str,
        accept_terms: bool,
        profile_picture: &str,
    ) -> Result<Session, AuthError>;

    /// Resolve the user owning an API token
    async fn get_user_by_token(&self, token: &str) -> Result<User, AuthError>;
}
