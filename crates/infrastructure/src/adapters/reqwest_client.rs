//! HTTP transport implementation using reqwest.
//!
//! This adapter implements the `HttpClient` port. It resolves relative
//! API paths against a configured base URL, attaches the bearer header
//! when the pipeline supplies one, and maps reqwest failures onto the
//! port's transport error taxonomy. Retry policy lives entirely in the
//! pipeline; this adapter never retries.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use paragon_application::{ApiRequest, ApiResponse, HttpClient, HttpClientError, HttpMethod};
use reqwest::{Client, Method, Url};
use tracing::debug;

/// Whole-request timeout; the pipeline models none of its own.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// HTTP transport for the Paragon API built on `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestHttpClient {
    client: Client,
    base_url: Url,
}

impl ReqwestHttpClient {
    /// Creates a transport for the API at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the client cannot
    /// be constructed.
    pub fn new(base_url: &str) -> Result<Self, HttpClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {base_url}")))?;
        let client = Client::builder()
            .user_agent(concat!("Paragon/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| HttpClientError::Other(e.to_string()))?;

        Ok(Self { client, base_url })
    }

    /// Creates a transport with a custom reqwest client.
    #[must_use]
    pub const fn with_client(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    /// Maps reqwest errors to the port's transport errors.
    fn map_error(error: &reqwest::Error) -> HttpClientError {
        if error.is_timeout() {
            return HttpClientError::Timeout;
        }

        let host = || {
            error
                .url()
                .and_then(Url::host_str)
                .unwrap_or("unknown")
                .to_string()
        };

        if error.is_connect() {
            let message = error.to_string();
            let lower = message.to_lowercase();
            if lower.contains("dns") || lower.contains("resolve") {
                return HttpClientError::DnsError {
                    host: host(),
                    message,
                };
            }
            if lower.contains("refused") {
                return HttpClientError::ConnectionRefused { host: host() };
            }
            return HttpClientError::ConnectionFailed(message);
        }

        HttpClientError::Other(error.to_string())
    }
}

impl HttpClient for ReqwestHttpClient {
    fn execute(
        &self,
        request: ApiRequest,
    ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, HttpClientError>> + Send + '_>> {
        Box::pin(async move {
            let url = self
                .base_url
                .join(request.path.trim_start_matches('/'))
                .map_err(|e| HttpClientError::InvalidUrl(format!("{e}: {}", request.path)))?;

            let mut builder = self
                .client
                .request(Self::to_reqwest_method(request.method), url);

            if !request.query.is_empty() {
                builder = builder.query(&request.query);
            }
            if let Some(token) = &request.bearer {
                builder = builder.bearer_auth(token);
            }
            if let Some(body) = &request.body {
                builder = builder.json(body);
            }

            debug!(method = ?request.method, path = %request.path, "dispatching request");
            let response = builder.send().await.map_err(|e| Self::map_error(&e))?;

            let status = response.status().as_u16();
            let body = response
                .bytes()
                .await
                .map_err(|e| HttpClientError::Other(format!("failed to read body: {e}")))?
                .to_vec();

            Ok(ApiResponse::new(status, body))
        })
    }
}
