//! Rule-based customer segmentation.
//!
//! Two mutually exclusive rule sets are supported. Thresholds are computed
//! from whichever collection is classified, so membership is relative to the
//! rows passed in (usually the filtered view).
//!
//! | Rule set   | Segment              | Rule                                                  |
//! |------------|----------------------|-------------------------------------------------------|
//! | `Median`   | `Low-value`          | quantity > median(quantity) and total < median(total) |
//! | `Median`   | `High-value`         | quantity < median(quantity) and total > median(total) |
//! | `Median`   | `High-risk`          | total > median(total) and rating < 5                  |
//! | `Quartile` | `Total Customer`     | every row                                             |
//! | `Quartile` | `Sensitive Customer` | rating > 7, Member, total >= q75(total)               |
//! | `Quartile` | `Risk Customer`      | rating < 5, Normal, total <= q25(total)               |
//!
//! Results are sorted by descending `total`. Classifying an empty collection
//! returns an empty result without computing any threshold.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::{InsightsError, Result};
use crate::models::{CustomerType, Transaction};
use crate::stats;

// ---------------------------------------------------------------------------
// RuleSet
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleSet {
    /// Low-value / High-value / High-risk, split on medians.
    #[default]
    Median,
    /// Total / Sensitive / Risk, split on the quartiles of `total`.
    Quartile,
}

impl RuleSet {
    /// Segments belonging to this rule set, in display order.
    pub fn segments(&self) -> &'static [Segment] {
        match self {
            RuleSet::Median => &[Segment::LowValue, Segment::HighValue, Segment::HighRisk],
            RuleSet::Quartile => &[
                Segment::TotalCustomer,
                Segment::SensitiveCustomer,
                Segment::RiskCustomer,
            ],
        }
    }

    /// Resolve a segment label within this rule set.
    ///
    /// Matching ignores case and an optional trailing `customers`, so both
    /// `High-risk` and `High-risk customers` resolve.
    pub fn segment(&self, name: &str) -> Result<Segment> {
        let wanted = normalize_label(name);
        self.segments()
            .iter()
            .copied()
            .find(|s| normalize_label(s.label()) == wanted)
            .ok_or_else(|| InsightsError::UnknownSegmentName {
                name: name.to_string(),
                rule_set: self.to_string(),
            })
    }
}

impl fmt::Display for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RuleSet::Median => "median",
            RuleSet::Quartile => "quartile",
        })
    }
}

impl FromStr for RuleSet {
    type Err = InsightsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "median" => Ok(RuleSet::Median),
            "quartile" => Ok(RuleSet::Quartile),
            other => Err(InsightsError::InvalidArgument(format!(
                "unknown rule set '{}', expected 'median' or 'quartile'",
                other
            ))),
        }
    }
}

fn normalize_label(label: &str) -> String {
    let lower = label.trim().to_ascii_lowercase();
    let stripped = lower
        .strip_suffix("customers")
        .or_else(|| lower.strip_suffix("customer"))
        .unwrap_or(&lower);
    stripped.trim().to_string()
}

// ---------------------------------------------------------------------------
// Segment
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    LowValue,
    HighValue,
    HighRisk,
    TotalCustomer,
    SensitiveCustomer,
    RiskCustomer,
}

impl Segment {
    pub fn label(&self) -> &'static str {
        match self {
            Segment::LowValue => "Low-value",
            Segment::HighValue => "High-value",
            Segment::HighRisk => "High-risk",
            Segment::TotalCustomer => "Total Customer",
            Segment::SensitiveCustomer => "Sensitive Customer",
            Segment::RiskCustomer => "Risk Customer",
        }
    }

    pub fn rule_set(&self) -> RuleSet {
        match self {
            Segment::LowValue | Segment::HighValue | Segment::HighRisk => RuleSet::Median,
            Segment::TotalCustomer | Segment::SensitiveCustomer | Segment::RiskCustomer => {
                RuleSet::Quartile
            }
        }
    }

    /// Plain-language explanation shown next to the segment table.
    pub fn description(&self) -> &'static str {
        match self {
            Segment::LowValue => {
                "Buys more items per transaction than half of all customers, \
                 yet spends less than half of them"
            }
            Segment::HighValue => {
                "Buys fewer items per transaction than half of all customers, \
                 yet spends more than half of them"
            }
            Segment::HighRisk => {
                "Spends more than half of all customers but rated the visit below 5.0"
            }
            Segment::TotalCustomer => "Every transaction in the current selection",
            Segment::SensitiveCustomer => {
                "Members rating above 7.0 whose spend is in the top quarter"
            }
            Segment::RiskCustomer => {
                "Normal customers rating below 5.0 whose spend is in the bottom quarter"
            }
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Thresholds
// ---------------------------------------------------------------------------

/// Statistics a rule set compares rows against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Thresholds {
    Median { quantity: f64, total: f64 },
    Quartile { total_q25: f64, total_q75: f64 },
}

impl Thresholds {
    /// Compute the thresholds for `rule_set` over `transactions`.
    ///
    /// Fails with [`InsightsError::EmptyInputStatistics`] on empty input.
    pub fn compute(rule_set: RuleSet, transactions: &[Transaction]) -> Result<Self> {
        let totals: Vec<f64> = transactions.iter().map(|t| t.total).collect();
        match rule_set {
            RuleSet::Median => {
                let quantities: Vec<f64> =
                    transactions.iter().map(|t| f64::from(t.quantity)).collect();
                Ok(Thresholds::Median {
                    quantity: stats::median(&quantities)?,
                    total: stats::median(&totals)?,
                })
            }
            RuleSet::Quartile => Ok(Thresholds::Quartile {
                total_q25: stats::quantile(&totals, 0.25)?,
                total_q75: stats::quantile(&totals, 0.75)?,
            }),
        }
    }

    fn matches(&self, segment: Segment, tx: &Transaction) -> bool {
        let quantity = f64::from(tx.quantity);
        match (segment, *self) {
            (Segment::LowValue, Thresholds::Median { quantity: qm, total: tm }) => {
                quantity > qm && tx.total < tm
            }
            (Segment::HighValue, Thresholds::Median { quantity: qm, total: tm }) => {
                quantity < qm && tx.total > tm
            }
            (Segment::HighRisk, Thresholds::Median { total: tm, .. }) => {
                tx.total > tm && tx.rating < 5.0
            }
            (Segment::TotalCustomer, Thresholds::Quartile { .. }) => true,
            (Segment::SensitiveCustomer, Thresholds::Quartile { total_q75, .. }) => {
                tx.rating > 7.0
                    && tx.customer_type == CustomerType::Member
                    && tx.total >= total_q75
            }
            (Segment::RiskCustomer, Thresholds::Quartile { total_q25, .. }) => {
                tx.rating < 5.0 && tx.customer_type == CustomerType::Normal && tx.total <= total_q25
            }
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Classifier
// ---------------------------------------------------------------------------

/// Classifies transactions into the segments of one [`RuleSet`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Classifier {
    rule_set: RuleSet,
}

impl Classifier {
    pub fn new(rule_set: RuleSet) -> Self {
        Self { rule_set }
    }

    pub fn rule_set(&self) -> RuleSet {
        self.rule_set
    }

    /// Rows of `transactions` in `segment`, sorted by descending total.
    ///
    /// Fails with [`InsightsError::UnknownSegmentName`] if `segment` belongs
    /// to the other rule set.
    pub fn classify(
        &self,
        transactions: &[Transaction],
        segment: Segment,
    ) -> Result<Vec<Transaction>> {
        if segment.rule_set() != self.rule_set {
            return Err(InsightsError::UnknownSegmentName {
                name: segment.label().to_string(),
                rule_set: self.rule_set.to_string(),
            });
        }
        if transactions.is_empty() {
            return Ok(Vec::new());
        }

        let thresholds = Thresholds::compute(self.rule_set, transactions)?;
        let mut rows: Vec<Transaction> = transactions
            .iter()
            .filter(|tx| thresholds.matches(segment, tx))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.total.total_cmp(&a.total));

        debug!(
            %segment,
            ?thresholds,
            input = transactions.len(),
            matched = rows.len(),
            "classified segment"
        );
        Ok(rows)
    }

    /// Like [`classify`](Self::classify), resolving `name` first.
    pub fn classify_named(
        &self,
        transactions: &[Transaction],
        name: &str,
    ) -> Result<Vec<Transaction>> {
        let segment = self.rule_set.segment(name)?;
        self.classify(transactions, segment)
    }
}
