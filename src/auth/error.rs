//! Errors raised by the auth API client

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// Connection, TLS or timeout failure
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("request rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    /// A 2xx body that does not match the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid API URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
