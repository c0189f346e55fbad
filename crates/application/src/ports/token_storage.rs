//! Persisted session storage port.
//!
//! The three persisted keys (`access`, `refresh`, `username`) live
//! behind this trait so the token store can be backed by a real file in
//! production and by memory in tests. Storage is treated as always
//! succeeding: an adapter that cannot read degrades to returning the
//! empty session, and write failures are logged, not surfaced.

use std::sync::Mutex;

use serde::{Deserialize, Serialize};

/// The persisted session snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredSession {
    /// Current access token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access: Option<String>,
    /// Current refresh token.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh: Option<String>,
    /// Last successfully authenticated username.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

impl StoredSession {
    /// True when nothing is persisted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.access.is_none() && self.refresh.is_none() && self.username.is_none()
    }
}

/// Port for durably persisting the session snapshot.
pub trait TokenStorage: Send + Sync {
    /// Loads the persisted session, or the empty session if unavailable.
    fn load(&self) -> StoredSession;

    /// Persists the full session snapshot.
    fn store(&self, session: &StoredSession);

    /// Removes all persisted keys unconditionally.
    fn clear(&self);
}

/// In-memory storage double for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct InMemoryTokenStorage {
    inner: Mutex<StoredSession>,
}

impl InMemoryTokenStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage pre-seeded with a session.
    #[must_use]
    pub fn with_session(session: StoredSession) -> Self {
        Self {
            inner: Mutex::new(session),
        }
    }
}

impl TokenStorage for InMemoryTokenStorage {
    fn load(&self) -> StoredSession {
        self.inner.lock().map(|s| s.clone()).unwrap_or_default()
    }

    fn store(&self, session: &StoredSession) {
        if let Ok(mut inner) = self.inner.lock() {
            *inner = session.clone();
        }
    }

    fn clear(&self) {
        if let Ok(mut inner) = self.inner.lock() {
            *inner = StoredSession::default();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn store_and_load_round_trip() {
        let storage = InMemoryTokenStorage::new();
        assert!(storage.load().is_empty());

        let session = StoredSession {
            access: Some("A1".to_string()),
            refresh: Some("R1".to_string()),
            username: Some("alice123".to_string()),
        };
        storage.store(&session);
        assert_eq!(storage.load(), session);

        storage.clear();
        assert!(storage.load().is_empty());
    }

    #[test]
    fn snapshot_serialization_skips_missing_keys() {
        let session = StoredSession {
            access: Some("A1".to_string()),
            refresh: None,
            username: None,
        };
        assert_eq!(
            serde_json::to_string(&session).unwrap(),
            r#"{"access":"A1"}"#
        );
    }
}
