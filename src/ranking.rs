//! Product-line rankings by sales, revenue and rating.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::models::Transaction;

/// Index the dashboard paints as the bottom of the leaderboard, when present.
pub const WORST_MARKER_INDEX: usize = 5;

/// The per-product-line aggregate to rank by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMetric {
    /// Sum of `total`.
    Total,
    /// Sum of `gross_income`.
    GrossIncome,
    /// Mean of `rating`.
    Rating,
}

impl RankMetric {
    pub const ALL: [RankMetric; 3] = [
        RankMetric::Total,
        RankMetric::GrossIncome,
        RankMetric::Rating,
    ];

    fn value(&self, tx: &Transaction) -> f64 {
        match self {
            RankMetric::Total => tx.total,
            RankMetric::GrossIncome => tx.gross_income,
            RankMetric::Rating => tx.rating,
        }
    }

    fn is_mean(&self) -> bool {
        matches!(self, RankMetric::Rating)
    }
}

impl fmt::Display for RankMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RankMetric::Total => "Sales",
            RankMetric::GrossIncome => "Revenue",
            RankMetric::Rating => "Rating",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub product_line: String,
    pub value: f64,
}

/// Product lines ordered by descending aggregate value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ranking {
    pub metric: RankMetric,
    pub entries: Vec<RankedEntry>,
}

impl Ranking {
    /// The top entry, if any.
    pub fn best(&self) -> Option<&RankedEntry> {
        self.entries.first()
    }

    /// [`WORST_MARKER_INDEX`] when the ranking is long enough to show it.
    ///
    /// This only marks a display position; entries after it are kept.
    pub fn worst_marker(&self) -> Option<usize> {
        (self.entries.len() > WORST_MARKER_INDEX).then_some(WORST_MARKER_INDEX)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Group `transactions` by product line and rank the groups by `metric`.
///
/// Ties keep the order in which product lines first appear in the input.
pub fn rank_product_lines(transactions: &[Transaction], metric: RankMetric) -> Ranking {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, f64, usize)> = Vec::new();

    for tx in transactions {
        let slot = *index.entry(tx.product_line.as_str()).or_insert_with(|| {
            groups.push((tx.product_line.as_str(), 0.0, 0));
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.1 += metric.value(tx);
        group.2 += 1;
    }

    let mut entries: Vec<RankedEntry> = groups
        .into_iter()
        .map(|(line, sum, count)| RankedEntry {
            product_line: line.to_string(),
            value: if metric.is_mean() { sum / count as f64 } else { sum },
        })
        .collect();
    // sort_by is stable, so equal values stay in first-appearance order
    entries.sort_by(|a, b| b.value.total_cmp(&a.value));

    Ranking { metric, entries }
}
