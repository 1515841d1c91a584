//! Headline metrics for the filtered collection.

use serde::{Deserialize, Serialize};

use crate::models::Transaction;

/// Text shown in place of a metric computed over no rows.
pub const NO_DATA: &str = "no data";

/// Total sales, revenue and average rating. Each is `None` when the
/// collection is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricsSummary {
    pub transactions: usize,
    pub total_sales: Option<f64>,
    pub gross_income: Option<f64>,
    pub average_rating: Option<f64>,
}

impl MetricsSummary {
    pub fn is_empty(&self) -> bool {
        self.transactions == 0
    }

    /// Total sales as shown on the dashboard, e.g. `$322967`.
    pub fn display_total_sales(&self) -> String {
        self.total_sales
            .map(|v| format!("${}", v.round()))
            .unwrap_or_else(|| NO_DATA.to_string())
    }

    /// Revenue as shown on the dashboard, e.g. `$15379`.
    pub fn display_gross_income(&self) -> String {
        self.gross_income
            .map(|v| format!("${}", v.round()))
            .unwrap_or_else(|| NO_DATA.to_string())
    }

    /// Average rating to two decimals.
    pub fn display_average_rating(&self) -> String {
        self.average_rating
            .map(|v| format!("{:.2}", v))
            .unwrap_or_else(|| NO_DATA.to_string())
    }
}

pub fn summarize(transactions: &[Transaction]) -> MetricsSummary {
    let n = transactions.len();
    if n == 0 {
        return MetricsSummary {
            transactions: 0,
            total_sales: None,
            gross_income: None,
            average_rating: None,
        };
    }

    let total_sales = transactions.iter().map(|t| t.total).sum::<f64>();
    let gross_income = transactions.iter().map(|t| t.gross_income).sum::<f64>();
    let rating_sum = transactions.iter().map(|t| t.rating).sum::<f64>();

    MetricsSummary {
        transactions: n,
        total_sales: Some(total_sales),
        gross_income: Some(gross_income),
        average_rating: Some(rating_sum / n as f64),
    }
}
