//! Aggregated rows returned by the chart endpoints.

use serde::{Deserialize, Serialize};

/// One day of cumulative sums from `/api/fetch/line-sums/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineSumPoint {
    /// ISO date (`YYYY-MM-DD`).
    pub day: String,
    /// Cumulative expense up to and including this day.
    pub expense: f64,
    /// Cumulative income up to and including this day.
    pub income: f64,
}

impl LineSumPoint {
    /// Running balance (income minus expense) at this day.
    #[must_use]
    pub fn balance(&self) -> f64 {
        self.income - self.expense
    }
}

/// Per-shop expense total from `/api/fetch/bar-shops/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopExpense {
    /// Shop name (lowercased by the server).
    pub shop: String,
    /// Summed expense for the selected period.
    pub expense_sum: f64,
}

/// Per-category expense slice from `/api/fetch/pie-categories/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySlice {
    /// Category code.
    pub category: String,
    /// Summed expense for the selected period.
    pub expense_sum: f64,
    /// CSS color reference supplied by the server for chart fills.
    pub fill: String,
}
