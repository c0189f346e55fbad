//! Domain error types

use thiserror::Error;

use crate::validation::ValidationError;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Input failed shape validation before any network activity.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A date could not be interpreted.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// A monetary value could not be parsed.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// An identifier is invalid or missing.
    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
