//! Paragon Application - Ports, authentication core, and API services
//!
//! This crate holds the client's moving parts: port traits implemented
//! by infrastructure adapters, the token store and authenticated request
//! pipeline, the session, and typed wrappers over the remote API.

pub mod auth;
pub mod error;
pub mod ports;
pub mod services;

pub use auth::{AuthPipeline, Session, TokenStore};
pub use error::{ApiError, ApiResult};
pub use ports::{
    ApiRequest, ApiResponse, HttpClient, HttpClientError, HttpMethod, InMemoryTokenStorage,
    StoredSession, TokenStorage,
};
pub use services::{
    ChartsService, PersonsService, ProfileService, ReceiptsService, SearchService,
};
