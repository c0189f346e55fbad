//! File-backed session storage.
//!
//! The three persisted keys (`access`, `refresh`, `username`) live in a
//! single JSON file under the user's config directory, e.g.
//! `~/.config/paragon/session.json`:
//!
//! ```json
//! {
//!   "access": "eyJ...",
//!   "refresh": "eyJ...",
//!   "username": "alice123"
//! }
//! ```
//!
//! The `TokenStorage` port treats storage as always succeeding: a
//! missing or unreadable file loads as the empty session, and write
//! failures are logged rather than surfaced. Tokens are credentials;
//! the file should not be world-readable in shared environments.

use std::fs;
use std::path::{Path, PathBuf};

use paragon_application::{StoredSession, TokenStorage};
use tracing::warn;

const SESSION_FILE: &str = "session.json";
const APP_DIR: &str = "paragon";

/// Session storage in a JSON file.
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Creates storage at the default per-user location, or `None` when
    /// no config directory exists on this platform.
    #[must_use]
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self {
            path: dir.join(APP_DIR).join(SESSION_FILE),
        })
    }

    /// Creates storage at an explicit file path.
    #[must_use]
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this storage reads and writes.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TokenStorage for FileTokenStorage {
    fn load(&self) -> StoredSession {
        match fs::read(&self.path) {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_else(|e| {
                warn!(path = %self.path.display(), error = %e, "session file unreadable; starting empty");
                StoredSession::default()
            }),
            Err(_) => StoredSession::default(),
        }
    }

    fn store(&self, session: &StoredSession) {
        if let Some(parent) = self.path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), error = %e, "cannot create session directory");
                return;
            }
        }
        match serde_json::to_vec_pretty(session) {
            Ok(bytes) => {
                if let Err(e) = fs::write(&self.path, bytes) {
                    warn!(path = %self.path.display(), error = %e, "cannot persist session");
                }
            }
            Err(e) => warn!(error = %e, "cannot serialize session"),
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "cannot remove session file");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn storage_in(dir: &tempfile::TempDir) -> FileTokenStorage {
        FileTokenStorage::at_path(dir.path().join("nested").join(SESSION_FILE))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(storage_in(&dir).load().is_empty());
    }

    #[test]
    fn store_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        let session = StoredSession {
            access: Some("A1".to_string()),
            refresh: Some("R1".to_string()),
            username: Some("alice123".to_string()),
        };
        storage.store(&session);

        assert_eq!(storage.load(), session);
        // A fresh instance at the same path sees the same state.
        assert_eq!(FileTokenStorage::at_path(storage.path()).load(), session);
    }

    #[test]
    fn clear_removes_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        storage.store(&StoredSession {
            access: Some("A1".to_string()),
            refresh: None,
            username: None,
        });
        storage.clear();

        assert!(!storage.path().exists());
        assert!(storage.load().is_empty());

        // Clearing again is a no-op, not an error.
        storage.clear();
    }

    #[test]
    fn corrupt_file_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage_in(&dir);

        fs::create_dir_all(storage.path().parent().unwrap()).unwrap();
        fs::write(storage.path(), b"{ not json").unwrap();

        assert!(storage.load().is_empty());
    }
}
