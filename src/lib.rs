//! Supermarket sales insights.
//!
//! Loads a supermarket transaction CSV (three cities, three months) into an
//! immutable in-memory snapshot via DuckDB, then answers the questions a
//! sales dashboard asks: filtered headline metrics, product-line rankings,
//! a monthly sales trend, product-line word frequencies and rule-based
//! customer segments.
//!
//! # Quick start
//!
//! ```no_run
//! use supermarket_insights::{RankMetric, SupermarketInsights};
//!
//! let insights = SupermarketInsights::builder()
//!     .source("data/supermarket_sales_raw.csv")
//!     .build()
//!     .unwrap();
//!
//! let query = insights.query(insights.universal_criteria());
//! println!("{}", query.metrics().display_total_sales());
//! let best = query.ranking(RankMetric::Total);
//! let risky = query.segment("High-risk customers").unwrap();
//! ```

#[cfg(feature = "async")]
pub mod async_client;
pub mod cache;
pub mod config;
pub mod connection;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod metrics;
pub mod models;
pub mod queries;
pub mod ranking;
pub mod segment;
pub mod sql_builder;
pub mod stats;
pub mod trend;
pub mod wordcloud;

#[cfg(test)]
mod fixtures;

#[cfg(feature = "async")]
pub use async_client::AsyncSupermarketInsights;
pub use cache::{CacheManager, DatasetSource};
pub use connection::Connection;
pub use dataset::Dataset;
pub use error::{InsightsError, Result};
pub use metrics::MetricsSummary;
pub use models::{City, CustomerType, Dashboard, DateRange, FilterCriteria, Gender, Transaction};
pub use queries::DashboardQuery;
pub use ranking::{RankMetric, Ranking};
pub use segment::{Classifier, RuleSet, Segment};
pub use sql_builder::SqlBuilder;
pub use trend::SalesTrend;

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

// ---------------------------------------------------------------------------
// SupermarketInsightsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`SupermarketInsights`] instance.
///
/// Use [`SupermarketInsights::builder()`] to obtain a builder, chain
/// configuration methods, and call [`build()`](SupermarketInsightsBuilder::build).
pub struct SupermarketInsightsBuilder {
    source: DatasetSource,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Duration,
    rule_set: RuleSet,
}

impl Default for SupermarketInsightsBuilder {
    fn default() -> Self {
        Self {
            source: DatasetSource::default(),
            cache_dir: None,
            offline: false,
            timeout: config::DEFAULT_TIMEOUT,
            rule_set: RuleSet::default(),
        }
    }
}

impl SupermarketInsightsBuilder {
    /// Set the dataset location: a file path, or an `http(s)` URL.
    ///
    /// Defaults to `data/supermarket_sales_raw.csv`.
    pub fn source(mut self, source: &str) -> Self {
        self.source = DatasetSource::parse(source);
        self
    }

    /// Set the dataset location to a local file.
    pub fn source_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source = DatasetSource::Path(path.as_ref().to_path_buf());
        self
    }

    /// Set a custom cache directory for downloaded datasets.
    ///
    /// If not set, the platform cache directory is used (e.g.
    /// `~/.cache/supermarket-insights` on Linux).
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    ///
    /// When offline, remote datasets are never downloaded; only a previously
    /// cached copy is used. Defaults to `false`.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for downloads. Defaults to 120 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Choose the segmentation rule set. Defaults to [`RuleSet::Median`].
    pub fn rule_set(mut self, rule_set: RuleSet) -> Self {
        self.rule_set = rule_set;
        self
    }

    /// Resolve the dataset, load it into DuckDB and snapshot the rows.
    pub fn build(self) -> Result<SupermarketInsights> {
        let cache = CacheManager::new(self.cache_dir, self.offline, self.timeout)?;
        let conn = Connection::new(cache)?;
        let csv_path = conn.cache.borrow_mut().ensure_dataset(&self.source)?;
        conn.register_csv(&csv_path)?;
        let dataset = Dataset::new(conn.load_transactions()?);
        info!(
            source = %self.source,
            rows = dataset.len(),
            rule_set = %self.rule_set,
            "dataset loaded"
        );
        Ok(SupermarketInsights {
            conn,
            dataset,
            source: self.source,
            classifier: Classifier::new(self.rule_set),
        })
    }
}

// ---------------------------------------------------------------------------
// SupermarketInsights
// ---------------------------------------------------------------------------

/// The main entry point.
///
/// Owns the DuckDB [`Connection`] and the immutable [`Dataset`] loaded from
/// it. Per-selection work goes through [`query()`](Self::query), which hands
/// out a lightweight borrowing [`DashboardQuery`].
pub struct SupermarketInsights {
    conn: Connection,
    dataset: Dataset,
    source: DatasetSource,
    classifier: Classifier,
}

impl SupermarketInsights {
    /// Create a new builder for configuring the client.
    pub fn builder() -> SupermarketInsightsBuilder {
        SupermarketInsightsBuilder::default()
    }

    /// Start a query for one filter selection.
    pub fn query(&self, criteria: FilterCriteria) -> DashboardQuery<'_> {
        DashboardQuery::new(&self.dataset, criteria, self.classifier)
    }

    /// The loaded rows. Clone it to share the snapshot across threads.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Criteria matching every loaded row.
    pub fn universal_criteria(&self) -> FilterCriteria {
        self.dataset.universal_criteria()
    }

    pub fn rule_set(&self) -> RuleSet {
        self.classifier.rule_set()
    }

    /// Execute a raw SQL query against the `sales` table.
    ///
    /// Columns in `sales` are the CSV headers as VARCHAR, plus `row_id`.
    pub fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        self.conn.execute(query, params)
    }

    /// Return a reference to the underlying [`Connection`] for advanced usage.
    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

// ---------------------------------------------------------------------------
// Display
// ---------------------------------------------------------------------------

impl fmt::Display for SupermarketInsights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.conn.cache.borrow();
        write!(
            f,
            "SupermarketInsights(source={}, rows={}, rule_set={}, cache_dir={}, offline={})",
            self.source,
            self.dataset.len(),
            self.classifier.rule_set(),
            cache.cache_dir.display(),
            cache.offline
        )
    }
}
