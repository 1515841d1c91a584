//! Monthly sales totals, one series per customer type.

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::models::{CustomerType, Transaction};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSeries {
    pub customer_type: CustomerType,
    /// One value per entry of [`SalesTrend::months`].
    pub values: Vec<f64>,
}

/// Sum of `total` per month and customer type.
///
/// `months` is contiguous from the first to the last month with any sale;
/// every customer type has a series and gaps are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesTrend {
    /// First day of each month.
    pub months: Vec<NaiveDate>,
    pub series: Vec<TrendSeries>,
}

impl SalesTrend {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// The total for `customer_type` in the month containing `month`.
    pub fn value(&self, month: NaiveDate, customer_type: CustomerType) -> Option<f64> {
        let idx = self.months.iter().position(|m| *m == month_start(month))?;
        self.series
            .iter()
            .find(|s| s.customer_type == customer_type)
            .and_then(|s| s.values.get(idx).copied())
    }
}

fn month_start(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn monthly_sales(transactions: &[Transaction]) -> SalesTrend {
    let mut sums: HashMap<(NaiveDate, CustomerType), f64> = HashMap::new();
    let mut first: Option<NaiveDate> = None;
    let mut last: Option<NaiveDate> = None;

    for tx in transactions {
        let month = month_start(tx.date);
        *sums.entry((month, tx.customer_type)).or_insert(0.0) += tx.total;
        first = Some(first.map_or(month, |f| f.min(month)));
        last = Some(last.map_or(month, |l| l.max(month)));
    }

    let mut months = Vec::new();
    if let (Some(first), Some(last)) = (first, last) {
        let mut cursor = Some(first);
        while let Some(month) = cursor.filter(|m| *m <= last) {
            months.push(month);
            cursor = month.checked_add_months(Months::new(1));
        }
    }

    let series = CustomerType::ALL
        .into_iter()
        .map(|customer_type| TrendSeries {
            customer_type,
            values: months
                .iter()
                .map(|m| sums.get(&(*m, customer_type)).copied().unwrap_or(0.0))
                .collect(),
        })
        .collect();

    SalesTrend { months, series }
}
