//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the application core and external
//! systems. Each port is a trait implemented by an adapter in the
//! infrastructure layer, or by a test double.

mod http;
mod token_storage;

pub use http::{ApiRequest, ApiResponse, HttpClient, HttpClientError, HttpMethod};
pub use token_storage::{InMemoryTokenStorage, StoredSession, TokenStorage};
