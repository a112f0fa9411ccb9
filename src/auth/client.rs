//! HTTP client for the NU Pay auth API
//!
//! Two JSON endpoints are used, both relative to the configured API URL:
//! `POST register` and `POST verify_token`.

use super::traits::AuthClientTrait;
use super::{AuthError, Session, User};
use crate::state::CountryCode;
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, instrument, warn};
use url::Url;

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

const REGISTER_PATH: &str = "register";
const VERIFY_TOKEN_PATH: &str = "verify_token";

/// Longest server message kept when a request is rejected
const MAX_MESSAGE_LEN: usize = 200;

#[derive(Debug, Serialize)]
struct RegisterPayload<'a> {
    email: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    password: &'a str,
    password_confirmation: &'a str,
    country_code: CountryCode,
    mobile: &'a str,
    accept_terms: bool,
    profile_picture: &'a str,
}

#[derive(Debug, Serialize)]
struct TokenPayload<'a> {
    api_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Client for the auth API
pub struct AuthClient {
    http: Client,
    base_url: Url,
}

impl AuthClient {
    /// Create a client for `api_url`. No timeout is applied unless one is given.
    pub fn new(api_url: &str, timeout: Option<Duration>) -> Result<Self, AuthError> {
        let mut builder = Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            http,
            base_url: base_url(api_url)?,
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthError> {
        Ok(self.base_url.join(path)?)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T, AuthError>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.endpoint(path)?;
        let response = self.http.post(url).json(body).send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = rejection_message(&bytes);
            warn!(status = status.as_u16(), %message, "Auth API rejected request");
            return Err(AuthError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedResponse(e.to_string()))
    }
}

/// Ensure the API URL ends with a slash so relative joins keep its path
fn base_url(api_url: &str) -> Result<Url, url::ParseError> {
    let trimmed = api_url.trim();
    if trimmed.ends_with('/') {
        Url::parse(trimmed)
    } else {
        Url::parse(&format!("{trimmed}/"))
    }
}

/// Best-effort extraction of a server error message
fn rejection_message(body: &[u8]) -> String {
    if let Ok(error) = serde_json::from_slice::<ErrorBody>(body) {
        return error.message;
    }
    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if text.is_empty() {
        "no details".to_string()
    } else {
        text.chars().take(MAX_MESSAGE_LEN).collect()
    }
}

#[async_trait]
impl AuthClientTrait for AuthClient {
    #[instrument(skip_all, fields(email = %email, country = country_code.code()))]
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
    ) -> Result<Session, AuthError> {
        let payload = RegisterPayload {
            email,
            first_name: full_name,
            last_name,
            password,
            password_confirmation,
            country_code,
            mobile: mobile_number,
            accept_terms,
            profile_picture,
        };
        let session: Session = self.post_json(REGISTER_PATH, &payload).await?;
        debug!("Registration accepted");
        Ok(session)
    }

    #[instrument(skip_all)]
    async fn get_user_by_token(&self, token: &str) -> Result<User, AuthError> {
        let user: User = self
            .post_json(VERIFY_TOKEN_PATH, &TokenPayload { api_token: token })
            .await?;
        debug!(user_id = user.id, "Fetched current user");
        Ok(user)
    }
}
