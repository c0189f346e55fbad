//! Authentication core for the Paragon client.
//!
//! This module provides:
//! - A synchronous token store mirroring persisted storage
//! - The authenticated request pipeline with single-flight token refresh
//! - The session exposing login/register/logout to the rest of the app

mod pipeline;
mod session;
mod token_store;

pub use pipeline::AuthPipeline;
pub use session::Session;
pub use token_store::TokenStore;
