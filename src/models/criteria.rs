use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::error::{InsightsError, Result};
use crate::models::{City, CustomerType, Gender, Transaction};

// ---------------------------------------------------------------------------
// DateRange
// ---------------------------------------------------------------------------

/// Inclusive calendar date range. `start > end` is allowed and matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering every representable date.
    pub fn unbounded() -> Self {
        Self {
            start: NaiveDate::MIN,
            end: NaiveDate::MAX,
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True when the range cannot contain any date.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

// ---------------------------------------------------------------------------
// FilterCriteria
// ---------------------------------------------------------------------------

/// The sidebar selection: a date range plus three multi-selects.
///
/// An empty set matches no transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub date_range: DateRange,
    pub cities: BTreeSet<City>,
    pub customer_types: BTreeSet<CustomerType>,
    pub genders: BTreeSet<Gender>,
}

impl FilterCriteria {
    /// Criteria with every city, customer type and gender selected.
    pub fn all(date_range: DateRange) -> Self {
        Self {
            date_range,
            cities: City::ALL.into_iter().collect(),
            customer_types: CustomerType::ALL.into_iter().collect(),
            genders: Gender::ALL.into_iter().collect(),
        }
    }

    /// Replace the selected cities.
    pub fn with_cities<I: IntoIterator<Item = City>>(mut self, cities: I) -> Self {
        self.cities = cities.into_iter().collect();
        self
    }

    /// Replace the selected customer types.
    pub fn with_customer_types<I: IntoIterator<Item = CustomerType>>(mut self, types: I) -> Self {
        self.customer_types = types.into_iter().collect();
        self
    }

    /// Replace the selected genders.
    pub fn with_genders<I: IntoIterator<Item = Gender>>(mut self, genders: I) -> Self {
        self.genders = genders.into_iter().collect();
        self
    }

    /// Replace the date range.
    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = DateRange::new(start, end);
        self
    }

    /// True when no transaction can satisfy these criteria.
    pub fn is_unsatisfiable(&self) -> bool {
        self.date_range.is_inverted()
            || self.cities.is_empty()
            || self.customer_types.is_empty()
            || self.genders.is_empty()
    }

    pub fn matches(&self, tx: &Transaction) -> bool {
        self.date_range.contains(tx.date)
            && self.cities.contains(&tx.city)
            && self.customer_types.contains(&tx.customer_type)
            && self.genders.contains(&tx.gender)
    }

    /// Strict check for callers that treat an inverted range as an error.
    pub fn validate(&self) -> Result<()> {
        if self.date_range.is_inverted() {
            return Err(InsightsError::InvalidFilterRange {
                start: self.date_range.start,
                end: self.date_range.end,
            });
        }
        Ok(())
    }
}
