//! Session state and the operations that change it.
//!
//! The session mirrors persisted storage for synchronous reads by the
//! UI; persisted storage (via the token store) remains the source of
//! truth. Login and registration run client-side validation before any
//! network call and report every violated field at once.

use std::sync::{Arc, RwLock};

use paragon_domain::{Credentials, RegisterPayload, SessionPhase, TokenPair, User};
use serde_json::json;
use tracing::{debug, info};

use crate::error::ApiResult;
use crate::ports::ApiRequest;

use super::AuthPipeline;

const LOGIN_PATH: &str = "/auth/jwt/create/";
const VERIFY_PATH: &str = "/auth/jwt/verify/";
const REGISTER_PATH: &str = "/auth/users/";
const ME_PATH: &str = "/auth/users/me/";

/// Current authentication state and session-mutating operations.
#[derive(Clone)]
pub struct Session {
    pipeline: AuthPipeline,
    phase: Arc<RwLock<SessionPhase>>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("phase", &self.phase())
            .field("username", &self.username())
            .finish()
    }
}

impl Session {
    /// Creates a session over a pipeline.
    ///
    /// A session restored from persisted storage (username and access
    /// token both present) reads as `Authenticated` straight away.
    #[must_use]
    pub fn new(pipeline: AuthPipeline) -> Self {
        Self {
            pipeline,
            phase: Arc::new(RwLock::new(SessionPhase::Anonymous)),
        }
    }

    /// The pipeline this session drives.
    #[must_use]
    pub fn pipeline(&self) -> &AuthPipeline {
        &self.pipeline
    }

    /// Current session phase.
    ///
    /// Derived from the token store rather than cached, so an
    /// unrecoverable refresh failure inside the pipeline (which clears
    /// the store) is immediately visible as `Anonymous`.
    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        let marked = self.phase.read().map(|p| *p).unwrap_or_default();
        if marked == SessionPhase::Authenticating {
            return SessionPhase::Authenticating;
        }
        if self.pipeline.tokens().is_authenticated() && self.username().is_some() {
            SessionPhase::Authenticated
        } else {
            SessionPhase::Anonymous
        }
    }

    /// Current username, if authenticated.
    #[must_use]
    pub fn username(&self) -> Option<String> {
        self.pipeline.tokens().username()
    }

    /// Logs in, storing both tokens and the username on success.
    ///
    /// # Errors
    ///
    /// - [`crate::ApiError::Validation`] before any network call when
    ///   the username is shorter than 3 characters or the password
    ///   shorter than 6
    /// - any pipeline error from the login endpoint, propagated
    ///   untouched
    pub async fn login(&self, username: &str, password: &str) -> ApiResult<TokenPair> {
        let credentials = Credentials::new(username, password);
        credentials.validate()?;

        self.set_phase(SessionPhase::Authenticating);
        let result = self
            .pipeline
            .send(ApiRequest::post(
                LOGIN_PATH,
                json!({ "username": credentials.username, "password": credentials.password }),
            ))
            .await
            .and_then(|response| response.json::<TokenPair>());

        match result {
            Ok(pair) => {
                self.pipeline.tokens().set_pair(&pair);
                self.pipeline.tokens().set_username(username);
                self.set_phase(SessionPhase::Authenticated);
                info!(username, "logged in");
                Ok(pair)
            }
            Err(e) => {
                self.set_phase(SessionPhase::Anonymous);
                Err(e)
            }
        }
    }

    /// Registers a new account, then immediately logs in with the same
    /// credentials.
    ///
    /// # Errors
    ///
    /// - [`crate::ApiError::Validation`] before any network call,
    ///   listing every violated field (email shape, username length,
    ///   password length, `re_password` mismatch)
    /// - any pipeline error from the registration or login endpoint;
    ///   either step's failure aborts the chain
    pub async fn register(&self, payload: &RegisterPayload) -> ApiResult<()> {
        payload.validate()?;

        self.set_phase(SessionPhase::Authenticating);
        let result = self
            .pipeline
            .send(ApiRequest::post(
                REGISTER_PATH,
                json!({
                    "email": payload.email,
                    "username": payload.username,
                    "password": payload.password,
                }),
            ))
            .await;

        if let Err(e) = result {
            self.set_phase(SessionPhase::Anonymous);
            return Err(e);
        }

        debug!(username = %payload.username, "registered; logging in");
        let credentials = payload.credentials();
        self.login(&credentials.username, &credentials.password)
            .await?;
        Ok(())
    }

    /// Clears the token store and local session state unconditionally.
    ///
    /// Never fails.
    pub fn logout(&self) {
        self.pipeline.tokens().clear();
        self.set_phase(SessionPhase::Anonymous);
        info!("logged out");
    }

    /// Attempts to re-establish a persisted session by fetching the
    /// profile through the pipeline.
    ///
    /// Returns `Ok(None)` without any network call when no username was
    /// persisted. A 401 funnels through the pipeline's usual
    /// refresh-then-logout path like any other request.
    ///
    /// # Errors
    ///
    /// Any pipeline error; auth failures leave the session `Anonymous`.
    pub async fn restore(&self) -> ApiResult<Option<User>> {
        if self.pipeline.tokens().username().is_none() {
            return Ok(None);
        }

        match self.pipeline.send(ApiRequest::get(ME_PATH)).await {
            Ok(response) => {
                let user: User = response.json()?;
                self.pipeline.tokens().set_username(user.username.clone());
                self.set_phase(SessionPhase::Authenticated);
                debug!(username = %user.username, "session restored");
                Ok(Some(user))
            }
            Err(e) => {
                self.set_phase(SessionPhase::Anonymous);
                Err(e)
            }
        }
    }

    /// Asks the server whether a token is currently valid.
    ///
    /// # Errors
    ///
    /// Transport errors only; a rejection is reported as `Ok(false)`.
    pub async fn verify(&self, token: &str) -> ApiResult<bool> {
        match self
            .pipeline
            .send(ApiRequest::post(VERIFY_PATH, json!({ "token": token })))
            .await
        {
            Ok(_) => Ok(true),
            Err(crate::ApiError::Transport(e)) => Err(e.into()),
            Err(_) => Ok(false),
        }
    }

    fn set_phase(&self, phase: SessionPhase) {
        if let Ok(mut current) = self.phase.write() {
            *current = phase;
        }
    }
}
