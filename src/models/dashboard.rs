use serde::{Deserialize, Serialize};

use crate::metrics::MetricsSummary;
use crate::models::{FilterCriteria, Transaction};
use crate::ranking::Ranking;
use crate::segment::{RuleSet, Segment};
use crate::trend::SalesTrend;
use crate::wordcloud::WordFrequency;

// ---------------------------------------------------------------------------
// SegmentTable — The classified rows behind the segmentation view
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentTable {
    pub rule_set: RuleSet,
    pub segment: Segment,
    pub description: String,
    pub rows: Vec<Transaction>,
}

// ---------------------------------------------------------------------------
// Dashboard — Everything the page renders for one selection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub criteria: FilterCriteria,
    pub metrics: MetricsSummary,
    pub rankings: Vec<Ranking>,
    pub trend: SalesTrend,
    pub word_frequencies: Vec<WordFrequency>,
    pub segment: SegmentTable,
}
