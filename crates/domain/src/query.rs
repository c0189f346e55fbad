//! Query parameter types for list and aggregation endpoints.
//!
//! The server reads two different list encodings: the receipt list
//! endpoint takes comma-joined values (`owners=1,2`), while the chart
//! endpoints take repeated bracketed keys (`owners[]=1&owners[]=2`).
//! Each query type renders itself to ordered key/value pairs that the
//! transport appends verbatim.

use crate::receipt::{Category, TransactionType};

/// Filters for `GET /api/receipts/`.
///
/// Lists are comma-joined on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReceiptQuery {
    /// Restrict to items owned by these persons.
    pub owners: Vec<i64>,
    /// Restrict to a payment month (1-12).
    pub month: Option<u32>,
    /// Restrict to a payment year.
    pub year: Option<i32>,
    /// Restrict to these item categories.
    pub category: Vec<Category>,
    /// Restrict to expenses or income.
    pub transaction_type: Option<TransactionType>,
}

impl ReceiptQuery {
    /// Filters for one month of one year.
    #[must_use]
    pub const fn for_month(year: i32, month: u32) -> Self {
        Self {
            owners: Vec::new(),
            month: Some(month),
            year: Some(year),
            category: Vec::new(),
            transaction_type: None,
        }
    }

    /// Renders the query as ordered key/value pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        if !self.owners.is_empty() {
            pairs.push(("owners".to_string(), join_ids(&self.owners)));
        }
        if let Some(month) = self.month {
            pairs.push(("month".to_string(), month.to_string()));
        }
        if let Some(year) = self.year {
            pairs.push(("year".to_string(), year.to_string()));
        }
        if !self.category.is_empty() {
            let joined = self
                .category
                .iter()
                .map(|c| c.as_str())
                .collect::<Vec<_>>()
                .join(",");
            pairs.push(("category".to_string(), joined));
        }
        if let Some(tt) = self.transaction_type {
            pairs.push(("transaction_type".to_string(), tt.as_str().to_string()));
        }
        pairs
    }
}

/// Parameters for the `/api/fetch/*` aggregation endpoints.
///
/// Lists use repeated bracketed keys on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartQuery {
    /// Persons to aggregate for (`owners[]`, repeated).
    pub owners: Vec<i64>,
    /// Selected month (1-12).
    pub month: u32,
    /// Selected year.
    pub year: i32,
    /// Optional category filter (`category[]`, repeated).
    pub category: Vec<Category>,
}

impl ChartQuery {
    /// Parameters for one owner in one month.
    #[must_use]
    pub fn new(owner: i64, year: i32, month: u32) -> Self {
        Self {
            owners: vec![owner],
            month,
            year,
            category: Vec::new(),
        }
    }

    /// Renders the query as ordered key/value pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();
        for owner in &self.owners {
            pairs.push(("owners[]".to_string(), owner.to_string()));
        }
        pairs.push(("month".to_string(), self.month.to_string()));
        pairs.push(("year".to_string(), self.year.to_string()));
        for category in &self.category {
            pairs.push(("category[]".to_string(), category.as_str().to_string()));
        }
        pairs
    }
}

fn join_ids(ids: &[i64]) -> String {
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn receipt_query_comma_joins_lists() {
        let query = ReceiptQuery {
            owners: vec![1, 2],
            month: Some(3),
            year: Some(2024),
            category: vec![Category::Fuel, Category::Alcohol],
            transaction_type: Some(TransactionType::Expense),
        };

        assert_eq!(
            query.to_pairs(),
            vec![
                ("owners".to_string(), "1,2".to_string()),
                ("month".to_string(), "3".to_string()),
                ("year".to_string(), "2024".to_string()),
                ("category".to_string(), "fuel,alcohol".to_string()),
                ("transaction_type".to_string(), "expense".to_string()),
            ]
        );
    }

    #[test]
    fn empty_receipt_query_renders_nothing() {
        assert!(ReceiptQuery::default().to_pairs().is_empty());
    }

    #[test]
    fn chart_query_repeats_bracketed_keys() {
        let query = ChartQuery {
            owners: vec![1, 2],
            month: 1,
            year: 2024,
            category: vec![Category::FoodDrinks],
        };

        assert_eq!(
            query.to_pairs(),
            vec![
                ("owners[]".to_string(), "1".to_string()),
                ("owners[]".to_string(), "2".to_string()),
                ("month".to_string(), "1".to_string()),
                ("year".to_string(), "2024".to_string()),
                ("category[]".to_string(), "food_drinks".to_string()),
            ]
        );
    }
}
