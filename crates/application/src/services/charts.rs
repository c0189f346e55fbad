//! Aggregation endpoints backing the summary charts.

use paragon_domain::{CategorySlice, ChartQuery, LineSumPoint, ShopExpense};

use crate::auth::AuthPipeline;
use crate::error::ApiResult;
use crate::ports::ApiRequest;

const LINE_SUMS_PATH: &str = "/api/fetch/line-sums/";
const BAR_SHOPS_PATH: &str = "/api/fetch/bar-shops/";
const PIE_CATEGORIES_PATH: &str = "/api/fetch/pie-categories/";

/// Pre-aggregated chart data for one owner and month.
#[derive(Debug, Clone)]
pub struct ChartsService {
    pipeline: AuthPipeline,
}

impl ChartsService {
    /// Creates the service.
    #[must_use]
    pub const fn new(pipeline: AuthPipeline) -> Self {
        Self { pipeline }
    }

    /// Cumulative daily expense/income sums for a month.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn line_sums(&self, query: &ChartQuery) -> ApiResult<Vec<LineSumPoint>> {
        let response = self
            .pipeline
            .send(ApiRequest::get(LINE_SUMS_PATH).with_query(query.to_pairs()))
            .await?;
        response.json()
    }

    /// Per-shop expense totals for a month, largest first.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn bar_shops(&self, query: &ChartQuery) -> ApiResult<Vec<ShopExpense>> {
        let response = self
            .pipeline
            .send(ApiRequest::get(BAR_SHOPS_PATH).with_query(query.to_pairs()))
            .await?;
        response.json()
    }

    /// Per-category expense slices for a month.
    ///
    /// # Errors
    ///
    /// Any pipeline error, or a decode error for an unexpected body.
    pub async fn pie_categories(&self, query: &ChartQuery) -> ApiResult<Vec<CategorySlice>> {
        let response = self
            .pipeline
            .send(ApiRequest::get(PIE_CATEGORIES_PATH).with_query(query.to_pairs()))
            .await?;
        response.json()
    }
}
