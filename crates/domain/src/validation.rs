//! Client-side input validation.
//!
//! Validation runs before any network call and reports every violated
//! field at once, so a form can highlight all problems in a single pass.

use std::fmt;

/// A single violated field with a human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Wire name of the violated field (e.g. `re_password`).
    pub field: String,
    /// Message suitable for display next to the field.
    pub message: String,
}

impl FieldError {
    /// Creates a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Input shape violation detected before any network call.
///
/// Carries one message per violated field, not just the first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// All violated fields, in declaration order.
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    /// Creates a validation error from collected field errors.
    #[must_use]
    pub const fn new(errors: Vec<FieldError>) -> Self {
        Self { errors }
    }

    /// Returns true when the given field is among the violations.
    #[must_use]
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    fn summary(&self) -> String {
        self.errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "validation failed: {}", self.summary())
    }
}

impl std::error::Error for ValidationError {}

/// Accumulates field errors while a payload is checked.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    /// Creates an empty validator.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Requires a minimum (character) length for a field.
    pub fn require_min_len(&mut self, field: &str, value: &str, min: usize, message: &str) {
        if value.chars().count() < min {
            self.errors.push(FieldError::new(field, message));
        }
    }

    /// Requires a plausibly-shaped email address.
    ///
    /// Checks for a non-empty local part and a dotted, non-empty domain.
    /// Full RFC validation is left to the server.
    pub fn require_email(&mut self, field: &str, value: &str, message: &str) {
        let ok = value.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        });
        if !ok {
            self.errors.push(FieldError::new(field, message));
        }
    }

    /// Requires two fields to match (e.g. password confirmation).
    pub fn require_match(&mut self, field: &str, a: &str, b: &str, message: &str) {
        if a != b {
            self.errors.push(FieldError::new(field, message));
        }
    }

    /// Finishes validation, returning all collected violations if any.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every violated field.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.errors))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn collects_every_violation() {
        let mut v = Validator::new();
        v.require_min_len("username", "ab", 3, "too short");
        v.require_min_len("password", "12345", 6, "too short");
        let err = v.finish().unwrap_err();
        assert_eq!(err.errors.len(), 2);
        assert!(err.has_field("username"));
        assert!(err.has_field("password"));
    }

    #[test]
    fn email_shapes() {
        for bad in ["", "plain", "@host.com", "user@", "user@host", "user@.com", "user@host."] {
            let mut v = Validator::new();
            v.require_email("email", bad, "invalid email");
            assert!(v.finish().is_err(), "accepted {bad:?}");
        }

        let mut v = Validator::new();
        v.require_email("email", "alice@example.com", "invalid email");
        assert!(v.finish().is_ok());
    }

    #[test]
    fn match_check() {
        let mut v = Validator::new();
        v.require_match("re_password", "secret1", "secret2", "passwords do not match");
        let err = v.finish().unwrap_err();
        assert_eq!(err.errors[0].field, "re_password");
    }
}
