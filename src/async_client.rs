//! Async wrapper around [`SupermarketInsights`] for use in async runtimes.
//!
//! Loading and queries run on Tokio's blocking thread pool via
//! [`tokio::task::spawn_blocking`], keeping the async event loop free.
//!
//! # Example
//!
//! ```no_run
//! use supermarket_insights::AsyncSupermarketInsights;
//!
//! #[tokio::main]
//! async fn main() {
//!     let insights = AsyncSupermarketInsights::builder()
//!         .source("data/supermarket_sales_raw.csv")
//!         .build()
//!         .await
//!         .unwrap();
//!
//!     let criteria = insights.universal_criteria().await.unwrap();
//!     let dashboard = insights.dashboard(criteria, "High-value").await.unwrap();
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::error::{InsightsError, Result};
use crate::models::{Dashboard, FilterCriteria};
use crate::segment::RuleSet;
use crate::{Dataset, SupermarketInsights};

// ---------------------------------------------------------------------------
// AsyncSupermarketInsightsBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing an [`AsyncSupermarketInsights`].
#[derive(Default)]
pub struct AsyncSupermarketInsightsBuilder {
    source: Option<String>,
    cache_dir: Option<PathBuf>,
    offline: bool,
    timeout: Option<Duration>,
    rule_set: RuleSet,
}

impl AsyncSupermarketInsightsBuilder {
    /// Set the dataset location: a file path, or an `http(s)` URL.
    pub fn source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    /// Set a custom cache directory.
    pub fn cache_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.cache_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Enable or disable offline mode.
    pub fn offline(mut self, offline: bool) -> Self {
        self.offline = offline;
        self
    }

    /// Set the HTTP request timeout for downloads.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Choose the segmentation rule set.
    pub fn rule_set(mut self, rule_set: RuleSet) -> Self {
        self.rule_set = rule_set;
        self
    }

    /// Build the client on the blocking thread pool.
    pub async fn build(self) -> Result<AsyncSupermarketInsights> {
        tokio::task::spawn_blocking(move || {
            let mut builder = SupermarketInsights::builder()
                .offline(self.offline)
                .rule_set(self.rule_set);
            if let Some(source) = &self.source {
                builder = builder.source(source);
            }
            if let Some(dir) = self.cache_dir {
                builder = builder.cache_dir(dir);
            }
            if let Some(timeout) = self.timeout {
                builder = builder.timeout(timeout);
            }
            let insights = builder.build()?;
            Ok(AsyncSupermarketInsights {
                inner: Arc::new(Mutex::new(insights)),
            })
        })
        .await
        .map_err(|e| InsightsError::InvalidArgument(format!("Task join error: {e}")))?
    }
}

// ---------------------------------------------------------------------------
// AsyncSupermarketInsights
// ---------------------------------------------------------------------------

/// Async wrapper around [`SupermarketInsights`].
///
/// The client is held behind a [`Mutex`] since its DuckDB connection uses
/// interior mutability. [`dataset()`](Self::dataset) takes the lock once to
/// clone the shared rows; work done on that clone runs without the lock.
#[derive(Clone)]
pub struct AsyncSupermarketInsights {
    inner: Arc<Mutex<SupermarketInsights>>,
}

impl AsyncSupermarketInsights {
    /// Create a new builder for configuring the async client.
    pub fn builder() -> AsyncSupermarketInsightsBuilder {
        AsyncSupermarketInsightsBuilder::default()
    }

    /// Run a sync operation on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&SupermarketInsights) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let inner = self.inner.clone();
        tokio::task::spawn_blocking(move || {
            let guard = inner
                .lock()
                .map_err(|_| InsightsError::InvalidArgument("client lock poisoned".into()))?;
            f(&guard)
        })
        .await
        .map_err(|e| InsightsError::InvalidArgument(format!("Task join error: {e}")))?
    }

    /// A shared handle to the loaded rows.
    pub async fn dataset(&self) -> Result<Dataset> {
        self.run(|s| Ok(s.dataset().clone())).await
    }

    /// Criteria matching every loaded row.
    pub async fn universal_criteria(&self) -> Result<FilterCriteria> {
        self.run(|s| Ok(s.universal_criteria())).await
    }

    /// Build the full dashboard for `criteria` with `segment` selected.
    pub async fn dashboard(&self, criteria: FilterCriteria, segment: &str) -> Result<Dashboard> {
        let segment = segment.to_string();
        self.run(move |s| s.query(criteria).snapshot(&segment)).await
    }

    /// Execute a raw SQL query asynchronously.
    pub async fn sql(
        &self,
        query: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let query = query.to_string();
        let params = params.to_vec();
        self.run(move |s| s.sql(&query, &params)).await
    }
}
