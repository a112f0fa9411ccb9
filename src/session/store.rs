//! Session persistence

use crate::auth::{Session, User};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, warn};

/// Where the authenticated session and current user live for the rest
/// of the application. Only the submission pipeline writes; callers own
/// the sequencing.
#[cfg_attr(test, mockall::automock)]
pub trait SessionStore: Send + Sync {
    /// Store a session, or clear it with `None`
    fn save(&self, session: Option<Session>);

    /// Store the current user, or clear it with `None`
    fn set_current_user(&self, user: Option<User>);

    /// The signed-in user, if any
    fn current_user(&self) -> Option<User>;
}

/// On-disk layout of the session file
#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    session: Session,
    saved_at: DateTime<Utc>,
}

/// Session store backed by a JSON file; the current user is kept in memory
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    session: Mutex<Option<Session>>,
    current_user: Mutex<Option<User>>,
}

impl FileSessionStore {
    /// Open the store, picking up a session saved by a previous run
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let session = read_session(&path)?;
        if session.is_some() {
            debug!(path = %path.display(), "Loaded saved session");
        }
        Ok(Self {
            path,
            session: Mutex::new(session),
            current_user: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn session(&self) -> Option<Session> {
        match self.session.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn persist(&self, session: Option<&Session>) -> Result<()> {
        match session {
            Some(session) => {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let stored = StoredSession {
                    session: session.clone(),
                    saved_at: Utc::now(),
                };
                write_private(&self.path, &serde_json::to_string_pretty(&stored)?)?;
            }
            None => match fs::remove_file(&self.path) {
                Ok(()) => {}
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            },
        }
        Ok(())
    }
}

/// Write a file only the current user can read; it holds the api token
fn write_private(path: &Path, contents: &str) -> io::Result<()> {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(path)?;
    // The mode above only applies to new files
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(contents.as_bytes())
}

fn read_session(path: &Path) -> Result<Option<Session>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    match serde_json::from_str::<StoredSession>(&content) {
        Ok(stored) => Ok(Some(stored.session)),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Ignoring unreadable session file");
            Ok(None)
        }
    }
}

impl SessionStore for FileSessionStore {
    fn save(&self, session: Option<Session>) {
        // Persistence failures never reach the form
        if let Err(e) = self.persist(session.as_ref()) {
            warn!(path = %self.path.display(), error = %e, "Failed to persist session");
        }
        match self.session.lock() {
            Ok(mut guard) => *guard = session,
            Err(poisoned) => *poisoned.into_inner() = session,
        }
    }

    fn set_current_user(&self, user: Option<User>) {
        match self.current_user.lock() {
            Ok(mut guard) => *guard = user,
            Err(poisoned) => *poisoned.into_inner() = user,
        }
    }

    fn current_user(&self) -> Option<User> {
        match self.current_user.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn test_user() -> User {
        User {
            id: 1,
            email: "ana@example.com".to_string(),
            first_name: "Ana".to_string(),
            last_name: "Ruiz".to_string(),
            country_code: None,
            mobile: None,
            profile_picture: None,
        }
    }

    #[test]
    fn test_open_without_file_has_no_session() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::open(dir.path().join("session.json")).unwrap();
        assert!(store.session().is_none());
        assert!(store.current_user().is_none());
    }

    #[test]
    fn test_save_persists_and_reloads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.save(Some(Session::new("tok-1")));
        assert!(path.exists());
        assert_eq!(store.session(), Some(Session::new("tok-1")));

        let reopened = FileSessionStore::open(&path).unwrap();
        assert_eq!(reopened.session(), Some(Session::new("tok-1")));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw.get("saved_at").is_some());
    }

    #[cfg(unix)]
    #[test]
    fn test_session_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        // A pre-existing world-readable file is tightened too
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileSessionStore::open(&path).unwrap();
        store.save(Some(Session::new("tok-1")));

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_save_none_clears_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");

        let store = FileSessionStore::open(&path).unwrap();
        store.save(Some(Session::new("tok-1")));
        store.save(None);
        assert!(!path.exists());
        assert!(store.session().is_none());

        // Clearing twice is fine
        store.save(None);
    }

    #[test]
    fn test_unreadable_file_is_ignored() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        fs::write(&path, "not json").unwrap();

        let store = FileSessionStore::open(&path).unwrap();
        assert!(store.session().is_none());
    }

    #[test]
    fn test_current_user_is_kept_in_memory() {
        let dir = TempDir::new().unwrap();
        let store = FileSessionStore::open(dir.path().join("session.json")).unwrap();

        store.set_current_user(Some(test_user()));
        assert_eq!(store.current_user(), Some(test_user()));

        store.set_current_user(None);
        assert!(store.current_user().is_none());
    }
}
