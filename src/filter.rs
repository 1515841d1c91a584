//! Filter engine: reduces the dataset to the rows matching a [`FilterCriteria`].

use tracing::debug;

use crate::models::{FilterCriteria, Transaction};

/// Rows of `transactions` matching `criteria`, in their original order.
///
/// Never fails. An inverted date range or an empty selection set yields an
/// empty result rather than matching everything.
pub fn apply(transactions: &[Transaction], criteria: &FilterCriteria) -> Vec<Transaction> {
    if criteria.is_unsatisfiable() {
        debug!(?criteria, "filter criteria cannot match any transaction");
        return Vec::new();
    }

    let matched: Vec<Transaction> = transactions
        .iter()
        .filter(|tx| criteria.matches(tx))
        .cloned()
        .collect();
    debug!(input = transactions.len(), matched = matched.len(), "applied filter");
    matched
}
