//! The immutable transaction snapshot shared by every session.

use std::sync::{Arc, OnceLock};

use crate::models::{DateRange, FilterCriteria, Transaction};

static GLOBAL: OnceLock<Dataset> = OnceLock::new();

/// Read-only, cheaply clonable collection of transactions.
///
/// Clones share the same allocation, so a dataset can be handed to many
/// sessions or threads without copying rows.
#[derive(Debug, Clone)]
pub struct Dataset {
    rows: Arc<[Transaction]>,
}

impl Dataset {
    pub fn new(rows: Vec<Transaction>) -> Self {
        Self { rows: rows.into() }
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Earliest and latest transaction dates, or `None` when empty.
    pub fn date_bounds(&self) -> Option<DateRange> {
        let first = self.rows.iter().map(|t| t.date).min()?;
        let last = self.rows.iter().map(|t| t.date).max()?;
        Some(DateRange::new(first, last))
    }

    /// Criteria selecting every row: all categories over the full date span.
    pub fn universal_criteria(&self) -> FilterCriteria {
        FilterCriteria::all(self.date_bounds().unwrap_or_else(DateRange::unbounded))
    }

    /// Install `self` as the process-wide dataset.
    ///
    /// Returns `false` (leaving the existing one in place) if a dataset was
    /// already installed.
    pub fn install_global(self) -> bool {
        GLOBAL.set(self).is_ok()
    }

    /// The process-wide dataset, if one has been installed.
    pub fn global() -> Option<&'static Dataset> {
        GLOBAL.get()
    }
}

impl From<Vec<Transaction>> for Dataset {
    fn from(rows: Vec<Transaction>) -> Self {
        Self::new(rows)
    }
}
