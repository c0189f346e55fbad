//! Account profile types.

use serde::{Deserialize, Serialize};

/// The authenticated user's profile as returned by `/auth/users/me/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Server-assigned id.
    pub id: i64,
    /// Account email address.
    pub email: String,
    /// Account username.
    pub username: String,
    /// Optional avatar URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Partial profile update; only set fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileUpdate {
    /// New email address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// New avatar URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl ProfileUpdate {
    /// Returns true when no field is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.avatar.is_none()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn update_skips_unset_fields() {
        let update = ProfileUpdate {
            email: Some("new@example.com".to_string()),
            avatar: None,
        };
        assert_eq!(
            serde_json::to_string(&update).unwrap(),
            r#"{"email":"new@example.com"}"#
        );
    }

    #[test]
    fn profile_without_avatar() {
        let user: User = serde_json::from_str(
            r#"{"id": 5, "email": "a@b.co", "username": "alice123"}"#,
        )
        .unwrap();
        assert_eq!(user.avatar, None);
    }
}
