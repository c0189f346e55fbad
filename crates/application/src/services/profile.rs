//! Account profile operations against `/auth/users/me/`.

use paragon_domain::{ProfileUpdate, User};
use serde_json::json;

use crate::auth::AuthPipeline;
use crate::error::ApiResult;
use crate::ports::ApiRequest;

const ME_PATH: &str = "/auth/users/me/";

/// Profile read, update, and account deletion.
#[derive(Debug, Clone)]
pub struct ProfileService {
    pipeline: AuthPipeline,
}

impl ProfileService {
    /// Creates the service.
    #[must_use]
    pub const fn new(pipeline: AuthPipeline) -> Self {
        Self { pipeline }
    }

    /// Fetches the authenticated user's profile.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn me(&self) -> ApiResult<User> {
        let response = self.pipeline.send(ApiRequest::get(ME_PATH)).await?;
        response.json()
    }

    /// Updates the profile; only set fields are sent.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn update(&self, update: &ProfileUpdate) -> ApiResult<User> {
        let body = serde_json::to_value(update)
            .map_err(|e| crate::ApiError::Decode(e.to_string()))?;
        let response = self.pipeline.send(ApiRequest::put(ME_PATH, body)).await?;
        response.json()
    }

    /// Deletes the account; requires the current password in the body
    /// (server replies 204).
    ///
    /// # Errors
    ///
    /// Any pipeline error.
    pub async fn delete_account(&self, current_password: &str) -> ApiResult<()> {
        self.pipeline
            .send(
                ApiRequest::delete(ME_PATH)
                    .with_body(json!({ "current_password": current_password })),
            )
            .await?;
        Ok(())
    }
}
