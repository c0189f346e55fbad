//! Authenticated request pipeline.
//!
//! Wraps every outgoing API call: attaches the current access token,
//! detects 401s, and transparently recovers from access-token expiry
//! exactly once per request. Concurrent 401s coalesce onto a single
//! refresh call (single-flight); while it is in flight, later failures
//! queue as waiters and share its outcome in FIFO order. A failed or
//! impossible refresh logs the session out before the error surfaces.

use std::sync::Arc;

use paragon_domain::AuthError;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::{Mutex, oneshot};
use tracing::{debug, warn};

use crate::error::{ApiError, ApiResult};
use crate::ports::{ApiRequest, ApiResponse, HttpClient};

use super::TokenStore;

const REFRESH_PATH: &str = "/auth/jwt/refresh/";

/// Body of a successful refresh response.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    access: String,
}

/// One request traveling through the pipeline with its retry budget.
///
/// The `attempt` counter is the visible form of the "retried at most
/// once" invariant: a request whose attempt is already 1 never triggers
/// a second refresh.
#[derive(Debug)]
struct RequestContext {
    request: ApiRequest,
    attempt: u8,
}

impl RequestContext {
    const fn new(request: ApiRequest) -> Self {
        Self {
            request,
            attempt: 0,
        }
    }

    const fn can_retry(&self) -> bool {
        self.attempt == 0
    }
}

/// Coordination state for the single in-flight refresh.
///
/// Only the leader transitions `in_flight` false→true and back; every
/// other 401 registers a waiter and shares the leader's outcome.
#[derive(Debug, Default)]
struct RefreshGate {
    in_flight: bool,
    waiters: Vec<oneshot::Sender<Option<String>>>,
}

enum GateEntry {
    /// This caller performs the refresh.
    Lead,
    /// A refresh is already in flight; await its outcome.
    Wait(oneshot::Receiver<Option<String>>),
}

struct Inner {
    transport: Arc<dyn HttpClient>,
    tokens: TokenStore,
    gate: Mutex<RefreshGate>,
}

/// The authenticated request pipeline.
///
/// Cheap to clone; all clones share the same transport, token store,
/// and refresh gate.
#[derive(Clone)]
pub struct AuthPipeline {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for AuthPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthPipeline").finish_non_exhaustive()
    }
}

impl AuthPipeline {
    /// Creates a pipeline over a transport and token store.
    #[must_use]
    pub fn new(transport: Arc<dyn HttpClient>, tokens: TokenStore) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                tokens,
                gate: Mutex::new(RefreshGate::default()),
            }),
        }
    }

    /// The token store this pipeline reads from and writes to.
    #[must_use]
    pub fn tokens(&self) -> &TokenStore {
        &self.inner.tokens
    }

    /// Sends a request, refreshing the access token once if needed.
    ///
    /// Returns the response for any 2xx status.
    ///
    /// # Errors
    ///
    /// - [`ApiError::Transport`] for network-level failures (never
    ///   retried)
    /// - [`ApiError::Server`] for non-2xx statuses other than 401
    /// - [`ApiError::Auth`] when a 401 survives the single refresh
    ///   attempt; the token store is cleared before this returns
    pub async fn send(&self, request: ApiRequest) -> ApiResult<ApiResponse> {
        let mut ctx = RequestContext::new(request);

        loop {
            let response = self.dispatch(&ctx).await?;

            if response.is_success() {
                return Ok(response);
            }
            if !response.is_unauthorized() {
                return Err(ApiError::Server {
                    status: response.status,
                    body: response.text(),
                });
            }
            if !ctx.can_retry() {
                // Even the refreshed token was rejected; give up without
                // a second refresh.
                warn!(path = %ctx.request.path, "401 after refresh; logging out");
                self.inner.tokens.clear();
                return Err(AuthError::Unauthorized {
                    detail: response.text(),
                }
                .into());
            }

            let token = self.obtain_fresh_token(&response).await?;
            ctx.request.bearer = Some(token);
            ctx.attempt += 1;
        }
    }

    /// Dispatches one attempt, attaching the stored access token unless
    /// the request already carries a credential.
    async fn dispatch(&self, ctx: &RequestContext) -> ApiResult<ApiResponse> {
        let mut request = ctx.request.clone();
        if request.bearer.is_none() {
            request.bearer = self.inner.tokens.access();
        }
        Ok(self.inner.transport.execute(request).await?)
    }

    /// Obtains a fresh access token, coalescing onto an in-flight
    /// refresh when one exists.
    ///
    /// `rejected` is the 401 that triggered this; waiters fail with it
    /// when the shared refresh settles unsuccessfully.
    async fn obtain_fresh_token(&self, rejected: &ApiResponse) -> ApiResult<String> {
        let entry = {
            let mut gate = self.inner.gate.lock().await;
            if gate.in_flight {
                let (tx, rx) = oneshot::channel();
                gate.waiters.push(tx);
                GateEntry::Wait(rx)
            } else {
                gate.in_flight = true;
                GateEntry::Lead
            }
        };

        match entry {
            GateEntry::Wait(rx) => {
                debug!("coalescing onto in-flight token refresh");
                match rx.await {
                    Ok(Some(token)) => Ok(token),
                    // Refresh settled without a token (or the leader
                    // vanished): fail with the original 401.
                    Ok(None) | Err(_) => Err(AuthError::Unauthorized {
                        detail: rejected.text(),
                    }
                    .into()),
                }
            }
            GateEntry::Lead => {
                let outcome = self.run_refresh().await;
                self.settle(outcome.as_ref().ok().cloned()).await;
                outcome
            }
        }
    }

    /// Calls the refresh endpoint with the stored refresh token and
    /// stores the new access token on success.
    ///
    /// Any failure clears the token store: the session is over.
    async fn run_refresh(&self) -> ApiResult<String> {
        let Some(refresh) = self.inner.tokens.refresh() else {
            warn!("access token rejected and no refresh token stored; logging out");
            self.inner.tokens.clear();
            return Err(AuthError::MissingRefreshToken.into());
        };

        debug!("access token rejected; refreshing");
        let request = ApiRequest::post(REFRESH_PATH, json!({ "refresh": refresh }));
        let response = match self.inner.transport.execute(request).await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "token refresh did not complete; logging out");
                self.inner.tokens.clear();
                return Err(e.into());
            }
        };

        if !response.is_success() {
            warn!(status = response.status, "token refresh rejected; logging out");
            self.inner.tokens.clear();
            return Err(AuthError::RefreshRejected {
                status: response.status,
                detail: response.text(),
            }
            .into());
        }

        let body: RefreshResponse = response.json()?;
        self.inner.tokens.set_access(body.access.clone());
        debug!("access token refreshed");
        Ok(body.access)
    }

    /// Settles the refresh gate: wakes all waiters in enqueue order and
    /// re-opens the gate for future refreshes.
    async fn settle(&self, outcome: Option<String>) {
        let mut gate = self.inner.gate.lock().await;
        gate.in_flight = false;
        for waiter in gate.waiters.drain(..) {
            // A waiter may have been dropped (caller aborted); that is
            // its own business.
            let _ = waiter.send(outcome.clone());
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::ports::{HttpClientError, InMemoryTokenStorage};
    use paragon_domain::TokenPair;
    use pretty_assertions::assert_eq;
    use std::collections::VecDeque;
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::Mutex as StdMutex;

    /// Transport that pops scripted responses per path and records
    /// every dispatched request.
    #[derive(Default)]
    struct ScriptedTransport {
        script: StdMutex<VecDeque<(String, Result<ApiResponse, HttpClientError>)>>,
        log: StdMutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        fn push(&self, path: &str, result: Result<ApiResponse, HttpClientError>) {
            self.script
                .lock()
                .unwrap()
                .push_back((path.to_string(), result));
        }

        fn requests(&self) -> Vec<ApiRequest> {
            self.log.lock().unwrap().clone()
        }

        fn refresh_calls(&self) -> usize {
            self.requests()
                .iter()
                .filter(|r| r.path == REFRESH_PATH)
                .count()
        }
    }

    impl HttpClient for ScriptedTransport {
        fn execute(
            &self,
            request: ApiRequest,
        ) -> Pin<Box<dyn Future<Output = Result<ApiResponse, HttpClientError>> + Send + '_>>
        {
            let next = {
                let mut script = self.script.lock().unwrap();
                let front = script.pop_front();
                match front {
                    Some((path, result)) => {
                        assert_eq!(path, request.path, "unexpected request order");
                        result
                    }
                    None => panic!("no scripted response for {}", request.path),
                }
            };
            self.log.lock().unwrap().push(request);
            Box::pin(async move { next })
        }
    }

    fn ok(body: &str) -> Result<ApiResponse, HttpClientError> {
        Ok(ApiResponse::new(200, body.as_bytes().to_vec()))
    }

    fn status(code: u16, body: &str) -> Result<ApiResponse, HttpClientError> {
        Ok(ApiResponse::new(code, body.as_bytes().to_vec()))
    }

    fn pipeline_with(transport: Arc<ScriptedTransport>) -> AuthPipeline {
        let tokens = TokenStore::new(Arc::new(InMemoryTokenStorage::new()));
        AuthPipeline::new(transport, tokens)
    }

    #[tokio::test]
    async fn attaches_stored_access_token() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push("/api/persons/", ok("[]"));

        let pipeline = pipeline_with(Arc::clone(&transport));
        pipeline.tokens().set_access("A1");

        pipeline.send(ApiRequest::get("/api/persons/")).await.unwrap();

        assert_eq!(transport.requests()[0].bearer.as_deref(), Some("A1"));
    }

    #[tokio::test]
    async fn refresh_then_retry_with_new_token() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push("/api/receipts/", status(401, "expired"));
        transport.push(REFRESH_PATH, ok(r#"{"access": "A2"}"#));
        transport.push("/api/receipts/", ok("[]"));

        let pipeline = pipeline_with(Arc::clone(&transport));
        pipeline.tokens().set_pair(&TokenPair::new("A1", "R1"));

        let response = pipeline.send(ApiRequest::get("/api/receipts/")).await.unwrap();
        assert_eq!(response.status, 200);

        let requests = transport.requests();
        assert_eq!(requests.len(), 3);
        assert_eq!(requests[2].bearer.as_deref(), Some("A2"));
        assert_eq!(pipeline.tokens().access().as_deref(), Some("A2"));
        // Refresh token is kept; only the access token rotates.
        assert_eq!(pipeline.tokens().refresh().as_deref(), Some("R1"));
    }

    #[tokio::test]
    async fn second_401_fails_without_second_refresh() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push("/api/receipts/", status(401, "expired"));
        transport.push(REFRESH_PATH, ok(r#"{"access": "A2"}"#));
        transport.push("/api/receipts/", status(401, "still expired"));

        let pipeline = pipeline_with(Arc::clone(&transport));
        pipeline.tokens().set_pair(&TokenPair::new("A1", "R1"));

        let err = pipeline
            .send(ApiRequest::get("/api/receipts/"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Auth(AuthError::Unauthorized { .. })
        ));
        assert_eq!(transport.refresh_calls(), 1);
        assert!(!pipeline.tokens().is_authenticated());
    }

    #[tokio::test]
    async fn failed_refresh_clears_session_and_surfaces_rejection() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push("/api/receipts/", status(401, "expired"));
        transport.push(REFRESH_PATH, status(401, "refresh expired"));

        let pipeline = pipeline_with(Arc::clone(&transport));
        pipeline.tokens().set_pair(&TokenPair::new("A1", "R1"));
        pipeline.tokens().set_username("alice123");

        let err = pipeline
            .send(ApiRequest::get("/api/receipts/"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Auth(AuthError::RefreshRejected { status: 401, .. })
        ));
        assert_eq!(pipeline.tokens().access(), None);
        assert_eq!(pipeline.tokens().refresh(), None);
        assert_eq!(pipeline.tokens().username(), None);
    }

    #[tokio::test]
    async fn missing_refresh_token_is_terminal() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push("/api/receipts/", status(401, "expired"));

        let pipeline = pipeline_with(Arc::clone(&transport));
        pipeline.tokens().set_access("A1"); // no refresh token

        let err = pipeline
            .send(ApiRequest::get("/api/receipts/"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Auth(AuthError::MissingRefreshToken)
        ));
        assert_eq!(transport.refresh_calls(), 0);
    }

    #[tokio::test]
    async fn non_401_errors_propagate_without_retry() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push("/api/receipts/", status(500, "boom"));

        let pipeline = pipeline_with(Arc::clone(&transport));
        pipeline.tokens().set_pair(&TokenPair::new("A1", "R1"));

        let err = pipeline
            .send(ApiRequest::get("/api/receipts/"))
            .await
            .unwrap_err();

        assert!(matches!(err, ApiError::Server { status: 500, .. }));
        assert_eq!(transport.requests().len(), 1);
        // Tokens untouched: only auth failures clear the session.
        assert!(pipeline.tokens().is_authenticated());
    }

    #[tokio::test]
    async fn transport_failures_propagate_without_retry() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.push("/api/receipts/", Err(HttpClientError::Timeout));

        let pipeline = pipeline_with(Arc::clone(&transport));
        pipeline.tokens().set_pair(&TokenPair::new("A1", "R1"));

        let err = pipeline
            .send(ApiRequest::get("/api/receipts/"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ApiError::Transport(HttpClientError::Timeout)
        ));
        assert_eq!(transport.requests().len(), 1);
    }
}
