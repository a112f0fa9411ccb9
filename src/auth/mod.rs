//! Auth API client module for HTTP communication

mod client;
mod error;
mod models;
mod traits;

pub use client::AuthClient;
pub use error::AuthError;
pub use models::{Session, User};
pub use traits::AuthClientTrait;

#[cfg(test)]
pub use traits::MockAuthClientTrait;
