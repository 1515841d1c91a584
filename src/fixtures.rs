//! Transaction builders shared by unit tests.

use chrono::NaiveDate;

use crate::models::{City, CustomerType, Gender, Transaction};

pub(crate) fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A Yangon member sale on 2019-01-01 with the given line, quantity and total.
pub(crate) fn tx(id: &str, product_line: &str, quantity: u32, total: f64) -> Transaction {
    Transaction {
        invoice_id: id.to_string(),
        branch: Some("A".to_string()),
        city: City::Yangon,
        customer_type: CustomerType::Member,
        gender: Gender::Female,
        product_line: product_line.to_string(),
        unit_price: total / f64::from(quantity.max(1)),
        quantity,
        total,
        date: date(2019, 1, 1),
        payment: Some("Cash".to_string()),
        gross_income: total * 0.05,
        rating: 7.0,
    }
}
