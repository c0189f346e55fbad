//! Receipt CRUD against `/api/receipts/`.

use paragon_domain::{Receipt, ReceiptQuery};

use crate::auth::AuthPipeline;
use crate::error::ApiResult;
use crate::ports::ApiRequest;

const RECEIPTS_PATH: &str = "/api/receipts/";

/// Receipt listing, creation, update, and deletion.
#[derive(Debug, Clone)]
pub struct ReceiptsService {
    pipeline: AuthPipeline,
}

impl ReceiptsService {
    /// Creates the service.
    #[must_use]
    pub const fn new(pipeline: AuthPipeline) -> Self {
        Self { pipeline }
    }

    /// Lists receipts matching the query.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn list(&self, query: &ReceiptQuery) -> ApiResult<Vec<Receipt>> {
        let response = self
            .pipeline
            .send(ApiRequest::get(RECEIPTS_PATH).with_query(query.to_pairs()))
            .await?;
        response.json()
    }

    /// Fetches a single receipt by id.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn get(&self, id: i64) -> ApiResult<Receipt> {
        let response = self
            .pipeline
            .send(ApiRequest::get(format!("{RECEIPTS_PATH}{id}/")))
            .await?;
        response.json()
    }

    /// Fetches several receipts by id, in order.
    ///
    /// # Errors
    ///
    /// The first failing fetch aborts the batch.
    pub async fn get_many(&self, ids: &[i64]) -> ApiResult<Vec<Receipt>> {
        let mut receipts = Vec::with_capacity(ids.len());
        for &id in ids {
            receipts.push(self.get(id).await?);
        }
        Ok(receipts)
    }

    /// Creates one or more receipts in a single request.
    ///
    /// The server replies 201 with the created receipts (ids assigned).
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn create(&self, receipts: &[Receipt]) -> ApiResult<Vec<Receipt>> {
        let body = serde_json::to_value(receipts)
            .map_err(|e| crate::ApiError::Decode(e.to_string()))?;
        let response = self
            .pipeline
            .send(ApiRequest::post(RECEIPTS_PATH, body))
            .await?;
        response.json()
    }

    /// Replaces a receipt.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn update(&self, id: i64, receipt: &Receipt) -> ApiResult<Receipt> {
        let body = serde_json::to_value(receipt)
            .map_err(|e| crate::ApiError::Decode(e.to_string()))?;
        let response = self
            .pipeline
            .send(ApiRequest::put(format!("{RECEIPTS_PATH}{id}/"), body))
            .await?;
        response.json()
    }

    /// Deletes a receipt (server replies 204).
    ///
    /// # Errors
    ///
    /// Any pipeline error.
    pub async fn delete(&self, id: i64) -> ApiResult<()> {
        self.pipeline
            .send(ApiRequest::delete(format!("{RECEIPTS_PATH}{id}/")))
            .await?;
        Ok(())
    }
}
