//! Authentication types: token pair, credentials, session phases.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::{ValidationError, Validator};

/// Access/refresh token pair returned by the token endpoint.
///
/// The access token is short-lived and attached to every API call; the
/// refresh token is longer-lived and used solely to obtain a new access
/// token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    /// Short-lived credential authorizing API calls.
    pub access: String,
    /// Longer-lived credential for obtaining new access tokens.
    pub refresh: String,
}

impl TokenPair {
    /// Creates a token pair.
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access: access.into(),
            refresh: refresh.into(),
        }
    }
}

/// Login credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    /// Account username.
    pub username: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Creates credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Checks the credential shape before any network call.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every violated field
    /// (username shorter than 3 characters, password shorter than 6).
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.require_min_len(
            "username",
            &self.username,
            3,
            "username must be at least 3 characters",
        );
        v.require_min_len(
            "password",
            &self.password,
            6,
            "password must be at least 6 characters",
        );
        v.finish()
    }
}

/// Registration payload with password confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterPayload {
    /// Account email address.
    pub email: String,
    /// Desired username.
    pub username: String,
    /// Desired password.
    pub password: String,
    /// Password confirmation; must match `password`.
    pub re_password: String,
}

impl RegisterPayload {
    /// Checks the payload shape before any network call.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing **every** violated field,
    /// not just the first: email shape, username length, password
    /// length, password confirmation mismatch (`re_password`).
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.require_email("email", &self.email, "invalid email address");
        v.require_min_len(
            "username",
            &self.username,
            3,
            "username must be at least 3 characters",
        );
        v.require_min_len(
            "password",
            &self.password,
            6,
            "password must be at least 6 characters",
        );
        v.require_match(
            "re_password",
            &self.password,
            &self.re_password,
            "passwords do not match",
        );
        v.finish()
    }

    /// Login credentials for the auto-login step after signup.
    #[must_use]
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.username.clone(), self.password.clone())
    }
}

/// Lifecycle of the client session.
///
/// `Anonymous` and `Authenticated` are the terminal states;
/// `Authenticating` only exists while a login or registration is in
/// flight. Logout or an unrecoverable refresh failure returns the
/// session to `Anonymous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// No username, no tokens.
    #[default]
    Anonymous,
    /// Login or registration in flight.
    Authenticating,
    /// Username set, tokens present.
    Authenticated,
}

/// Authentication failure terminal for the current session.
///
/// Every variant implies the token store has been cleared: the session
/// is logged out the moment one of these is produced, so the client can
/// never sit in an "authenticated but tokens gone" state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The server rejected the request even after a token refresh.
    #[error("unauthorized: {detail}")]
    Unauthorized {
        /// Response body of the final 401.
        detail: String,
    },

    /// The refresh endpoint rejected the stored refresh token.
    #[error("token refresh rejected (status {status}): {detail}")]
    RefreshRejected {
        /// HTTP status of the refresh response.
        status: u16,
        /// Response body of the refresh failure.
        detail: String,
    },

    /// A refresh was required but no refresh token is stored.
    #[error("no refresh token available")]
    MissingRefreshToken,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn credentials_validation() {
        assert!(Credentials::new("alice123", "secret1").validate().is_ok());

        let err = Credentials::new("al", "123").validate().unwrap_err();
        assert!(err.has_field("username"));
        assert!(err.has_field("password"));
    }

    #[test]
    fn register_reports_all_fields() {
        let payload = RegisterPayload {
            email: "not-an-email".to_string(),
            username: "ab".to_string(),
            password: "12345".to_string(),
            re_password: "54321".to_string(),
        };

        let err = payload.validate().unwrap_err();
        assert_eq!(err.errors.len(), 4);
        assert!(err.has_field("email"));
        assert!(err.has_field("username"));
        assert!(err.has_field("password"));
        assert!(err.has_field("re_password"));
    }

    #[test]
    fn token_pair_wire_shape() {
        let pair: TokenPair =
            serde_json::from_str(r#"{"access":"A1","refresh":"R1"}"#).unwrap();
        assert_eq!(pair, TokenPair::new("A1", "R1"));
    }

    #[test]
    fn session_phase_default_is_anonymous() {
        assert_eq!(SessionPhase::default(), SessionPhase::Anonymous);
    }
}
