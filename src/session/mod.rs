//! Session store shared with the rest of the application

mod store;

pub use store::{FileSessionStore, SessionStore};

#[cfg(test)]
pub use store::MockSessionStore;
