//! Autosuggest searches: recent shops and item predictions.

use serde::Deserialize;
use tracing::trace;

use crate::auth::AuthPipeline;
use crate::error::ApiResult;
use crate::ports::ApiRequest;

const RECENT_SHOPS_PATH: &str = "/api/recent-shops/";
const ITEM_PREDICTIONS_PATH: &str = "/api/item-predictions/";

/// Queries shorter than this return an empty suggestion list without a
/// network call.
const MIN_QUERY_LEN: usize = 3;

#[derive(Debug, Deserialize)]
struct SearchResults {
    results: Vec<String>,
}

/// Suggestion lookups for the receipt entry form.
#[derive(Debug, Clone)]
pub struct SearchService {
    pipeline: AuthPipeline,
}

impl SearchService {
    /// Creates the service.
    #[must_use]
    pub const fn new(pipeline: AuthPipeline) -> Self {
        Self { pipeline }
    }

    /// Shop names recently used by this account matching `query`.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn recent_shops(&self, query: &str) -> ApiResult<Vec<String>> {
        if query.chars().count() < MIN_QUERY_LEN {
            trace!(query, "query below minimum length; skipping request");
            return Ok(Vec::new());
        }

        let response = self
            .pipeline
            .send(
                ApiRequest::get(RECENT_SHOPS_PATH)
                    .with_query(vec![("q".to_string(), query.to_string())]),
            )
            .await?;
        let results: SearchResults = response.json()?;
        Ok(results.results)
    }

    /// Item descriptions frequently bought at `shop` matching `query`.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn item_predictions(&self, shop: &str, query: &str) -> ApiResult<Vec<String>> {
        if query.chars().count() < MIN_QUERY_LEN {
            trace!(query, "query below minimum length; skipping request");
            return Ok(Vec::new());
        }

        let response = self
            .pipeline
            .send(ApiRequest::get(ITEM_PREDICTIONS_PATH).with_query(vec![
                ("shop".to_string(), shop.to_string()),
                ("q".to_string(), query.to_string()),
            ]))
            .await?;
        let results: SearchResults = response.json()?;
        Ok(results.results)
    }
}
