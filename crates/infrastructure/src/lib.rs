//! Paragon Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in
//! the application layer: a reqwest-backed HTTP transport and a
//! file-backed session store.

pub mod adapters;
pub mod persistence;

pub use adapters::ReqwestHttpClient;
pub use persistence::FileTokenStorage;
