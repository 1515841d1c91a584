//! Per-selection dashboard queries over a shared [`Dataset`].

use tracing::debug;

use crate::dataset::Dataset;
use crate::error::Result;
use crate::filter;
use crate::metrics::{self, MetricsSummary};
use crate::models::{Dashboard, FilterCriteria, SegmentTable, Transaction};
use crate::ranking::{self, RankMetric, Ranking};
use crate::segment::{Classifier, Segment};
use crate::trend::{self, SalesTrend};
use crate::wordcloud::{self, WordFrequency};

// ---------------------------------------------------------------------------
// DashboardQuery
// ---------------------------------------------------------------------------

/// One user's current selection, borrowing the shared dataset.
///
/// The filter runs once on construction; every metric, ranking and segment
/// reuses that filtered view.
pub struct DashboardQuery<'a> {
    dataset: &'a Dataset,
    criteria: FilterCriteria,
    classifier: Classifier,
    filtered: Vec<Transaction>,
}

impl<'a> DashboardQuery<'a> {
    /// Filter `dataset` by `criteria` and prepare the downstream views.
    pub fn new(dataset: &'a Dataset, criteria: FilterCriteria, classifier: Classifier) -> Self {
        let filtered = filter::apply(dataset.transactions(), &criteria);
        Self {
            dataset,
            criteria,
            classifier,
            filtered,
        }
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// Rows matching the criteria, in dataset order.
    pub fn filtered(&self) -> &[Transaction] {
        &self.filtered
    }

    /// Total sales, revenue and average rating of the filtered rows.
    pub fn metrics(&self) -> MetricsSummary {
        metrics::summarize(&self.filtered)
    }

    /// Product lines of the filtered rows ranked by `metric`.
    pub fn ranking(&self, metric: RankMetric) -> Ranking {
        ranking::rank_product_lines(&self.filtered, metric)
    }

    /// Sales, revenue and rating rankings, in that order.
    pub fn rankings(&self) -> Vec<Ranking> {
        RankMetric::ALL.iter().map(|m| self.ranking(*m)).collect()
    }

    /// Monthly sales of the filtered rows.
    pub fn trend(&self) -> SalesTrend {
        trend::monthly_sales(&self.filtered)
    }

    /// Monthly sales of the whole dataset, ignoring the selection.
    pub fn trend_global(&self) -> SalesTrend {
        trend::monthly_sales(self.dataset.transactions())
    }

    /// Word frequencies of every product line in the dataset.
    pub fn word_frequencies(&self) -> Vec<WordFrequency> {
        wordcloud::word_frequencies(self.dataset.transactions())
    }

    /// Classify the filtered rows; thresholds follow the selection.
    pub fn segment(&self, name: &str) -> Result<SegmentTable> {
        self.segment_table(name, &self.filtered)
    }

    /// Classify the whole dataset; thresholds ignore the selection.
    pub fn segment_global(&self, name: &str) -> Result<SegmentTable> {
        self.segment_table(name, self.dataset.transactions())
    }

    /// Everything the dashboard renders, with `segment_name` selected.
    ///
    /// The trend and word frequencies cover the whole dataset; every other
    /// panel follows the selection.
    pub fn snapshot(&self, segment_name: &str) -> Result<Dashboard> {
        let segment = self.segment(segment_name)?;
        debug!(
            filtered = self.filtered.len(),
            segment_rows = segment.rows.len(),
            "built dashboard snapshot"
        );
        Ok(Dashboard {
            criteria: self.criteria.clone(),
            metrics: self.metrics(),
            rankings: self.rankings(),
            trend: self.trend_global(),
            word_frequencies: self.word_frequencies(),
            segment,
        })
    }

    fn segment_table(&self, name: &str, rows: &[Transaction]) -> Result<SegmentTable> {
        let segment: Segment = self.classifier.rule_set().segment(name)?;
        let rows = self.classifier.classify(rows, segment)?;
        Ok(SegmentTable {
            rule_set: self.classifier.rule_set(),
            segment,
            description: segment.description().to_string(),
            rows,
        })
    }
}
