//! Token storage with synchronous reads.
//!
//! The store owns the access/refresh token pair and the last
//! authenticated username. Reads are served from an in-memory mirror
//! loaded once at construction; every write goes through to the
//! injected [`TokenStorage`] port. The store itself never fails: if
//! the underlying persistence is unavailable it degrades to returning
//! `None` consistently.

use std::sync::{Arc, RwLock};

use paragon_domain::TokenPair;

use crate::ports::{StoredSession, TokenStorage};

/// Process-wide store for the session's tokens and username.
#[derive(Clone)]
pub struct TokenStore {
    state: Arc<RwLock<StoredSession>>,
    storage: Arc<dyn TokenStorage>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore")
            .field("authenticated", &self.is_authenticated())
            .finish_non_exhaustive()
    }
}

impl TokenStore {
    /// Creates a store initialized from persisted storage.
    #[must_use]
    pub fn new(storage: Arc<dyn TokenStorage>) -> Self {
        let state = storage.load();
        Self {
            state: Arc::new(RwLock::new(state)),
            storage,
        }
    }

    /// Current access token, if any.
    #[must_use]
    pub fn access(&self) -> Option<String> {
        self.read(|s| s.access.clone())
    }

    /// Replaces the access token.
    pub fn set_access(&self, token: impl Into<String>) {
        self.write(|s| s.access = Some(token.into()));
    }

    /// Current refresh token, if any.
    #[must_use]
    pub fn refresh(&self) -> Option<String> {
        self.read(|s| s.refresh.clone())
    }

    /// Replaces the refresh token.
    pub fn set_refresh(&self, token: impl Into<String>) {
        self.write(|s| s.refresh = Some(token.into()));
    }

    /// Stores both tokens of a freshly issued pair.
    pub fn set_pair(&self, pair: &TokenPair) {
        self.write(|s| {
            s.access = Some(pair.access.clone());
            s.refresh = Some(pair.refresh.clone());
        });
    }

    /// Last successfully authenticated username, if any.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.read(|s| s.username.clone())
    }

    /// Replaces the stored username.
    pub fn set_username(&self, username: impl Into<String>) {
        self.write(|s| s.username = Some(username.into()));
    }

    /// True when an access token is present.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.read(|s| s.access.is_some())
    }

    /// Removes tokens and username unconditionally.
    ///
    /// Subsequent reads return `None` for every key.
    pub fn clear(&self) {
        if let Ok(mut state) = self.state.write() {
            *state = StoredSession::default();
        }
        self.storage.clear();
    }

    fn read<T: Default>(&self, f: impl FnOnce(&StoredSession) -> T) -> T {
        self.state.read().map_or_else(|_| T::default(), |s| f(&s))
    }

    fn write(&self, f: impl FnOnce(&mut StoredSession)) {
        if let Ok(mut state) = self.state.write() {
            f(&mut state);
            self.storage.store(&state);
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::InMemoryTokenStorage;
    use pretty_assertions::assert_eq;

    fn store() -> TokenStore {
        TokenStore::new(Arc::new(InMemoryTokenStorage::new()))
    }

    #[test]
    fn starts_from_persisted_state() {
        let storage = Arc::new(InMemoryTokenStorage::with_session(StoredSession {
            access: Some("A1".to_string()),
            refresh: Some("R1".to_string()),
            username: Some("alice123".to_string()),
        }));

        let store = TokenStore::new(storage);
        assert_eq!(store.access().as_deref(), Some("A1"));
        assert_eq!(store.username().as_deref(), Some("alice123"));
        assert!(store.is_authenticated());
    }

    #[test]
    fn writes_go_through_to_storage() {
        let storage = Arc::new(InMemoryTokenStorage::new());
        let store = TokenStore::new(Arc::clone(&storage) as Arc<dyn TokenStorage>);

        store.set_pair(&TokenPair::new("A1", "R1"));
        store.set_username("alice123");

        let persisted = storage.load();
        assert_eq!(persisted.access.as_deref(), Some("A1"));
        assert_eq!(persisted.refresh.as_deref(), Some("R1"));
        assert_eq!(persisted.username.as_deref(), Some("alice123"));
    }

    #[test]
    fn clear_removes_everything() {
        let store = store();
        store.set_pair(&TokenPair::new("A1", "R1"));
        store.set_username("alice123");

        store.clear();

        assert_eq!(store.access(), None);
        assert_eq!(store.refresh(), None);
        assert_eq!(store.username(), None);
        assert!(!store.is_authenticated());
    }

    #[test]
    fn replacing_access_keeps_refresh() {
        let store = store();
        store.set_pair(&TokenPair::new("A1", "R1"));
        store.set_access("A2");

        assert_eq!(store.access().as_deref(), Some("A2"));
        assert_eq!(store.refresh().as_deref(), Some("R1"));
    }
}
