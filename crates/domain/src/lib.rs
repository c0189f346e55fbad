//! Paragon Domain - Core business types
//!
//! This crate defines the domain model for the Paragon finance client.
//! All types here are pure Rust with no I/O dependencies.

pub mod auth;
pub mod charts;
pub mod error;
pub mod person;
pub mod query;
pub mod receipt;
pub mod user;
pub mod validation;

pub use auth::{AuthError, Credentials, RegisterPayload, SessionPhase, TokenPair};
pub use charts::{CategorySlice, LineSumPoint, ShopExpense};
pub use error::{DomainError, DomainResult};
pub use person::Person;
pub use query::{ChartQuery, ReceiptQuery};
pub use receipt::{Category, Item, Receipt, TransactionType};
pub use user::{ProfileUpdate, User};
pub use validation::{FieldError, ValidationError};
