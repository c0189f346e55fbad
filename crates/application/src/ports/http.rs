//! HTTP transport port.
//!
//! The pipeline talks to the network through this trait so the whole
//! auth core can be exercised against a scripted transport in tests.

use std::future::Future;
use std::pin::Pin;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::error::{ApiError, ApiResult};

/// HTTP methods the API uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

/// One outgoing API request, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Path relative to the base URL (e.g. `/api/receipts/`).
    pub path: String,
    /// Query pairs appended verbatim, in order.
    pub query: Vec<(String, String)>,
    /// Optional JSON body.
    pub body: Option<serde_json::Value>,
    /// Bearer token to attach, if any.
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// Creates a request with no query, body, or credential.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
            bearer: None,
        }
    }

    /// GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    /// POST request with a JSON body.
    pub fn post(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(HttpMethod::Post, path).with_body(body)
    }

    /// PUT request with a JSON body.
    pub fn put(path: impl Into<String>, body: serde_json::Value) -> Self {
        Self::new(HttpMethod::Put, path).with_body(body)
    }

    /// DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    /// Attaches query pairs.
    #[must_use]
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Attaches a JSON body.
    #[must_use]
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attaches a bearer token.
    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// A response received from the API.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl ApiResponse {
    /// Creates a response from status and body bytes.
    #[must_use]
    pub const fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    /// True for any 2xx status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// True for HTTP 401.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        self.status == 401
    }

    /// Body as lossy UTF-8 text.
    #[must_use]
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Decodes the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> ApiResult<T> {
        serde_json::from_slice(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }
}

/// Network-level failures where no usable response was received.
///
/// These propagate to the caller untouched and are never retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HttpClientError {
    /// The request did not complete within the transport's timeout.
    #[error("request timed out")]
    Timeout,

    /// The host could not be resolved.
    #[error("DNS lookup failed for {host}: {message}")]
    DnsError {
        /// Hostname that failed to resolve.
        host: String,
        /// Resolver message.
        message: String,
    },

    /// The server actively refused the connection.
    #[error("connection refused by {host}")]
    ConnectionRefused {
        /// Host that refused.
        host: String,
    },

    /// The connection could not be established.
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The request URL could not be built.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Any other transport-level failure.
    #[error("transport error: {0}")]
    Other(String),
}

/// Port for executing HTTP requests against the remote API.
pub trait HttpClient: Send + Sync {
    /// Executes a request, returning the raw response.
    ///
    /// Implementations attach the bearer header when
    /// [`ApiRequest::bearer`] is set and must not retry on their own;
    /// retry policy belongs to the pipeline.
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, HttpClientError>> + Send + '_>>;
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn request_builders() {
        let request = ApiRequest::get("/api/receipts/")
            .with_query(vec![("month".to_string(), "3".to_string())])
            .with_bearer("A1");

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.path, "/api/receipts/");
        assert_eq!(request.bearer.as_deref(), Some("A1"));
        assert!(request.body.is_none());
    }

    #[test]
    fn response_status_classes() {
        assert!(ApiResponse::new(204, Vec::new()).is_success());
        assert!(!ApiResponse::new(401, Vec::new()).is_success());
        assert!(ApiResponse::new(401, Vec::new()).is_unauthorized());
        assert!(!ApiResponse::new(403, Vec::new()).is_unauthorized());
    }

    #[test]
    fn response_json_decode() {
        let response = ApiResponse::new(200, br#"{"access": "A2"}"#.to_vec());
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["access"], "A2");

        let bad = ApiResponse::new(200, b"not json".to_vec());
        assert!(matches!(
            bad.json::<serde_json::Value>(),
            Err(ApiError::Decode(_))
        ));
    }
}
