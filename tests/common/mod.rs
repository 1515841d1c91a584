//! Shared test fixtures for the integration tests.
//!
//! Provides a ten-row sales CSV in the dataset's native layout and helpers
//! that load it through the real DuckDB pipeline.

#![allow(dead_code)]

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use supermarket_insights::{CacheManager, Connection, RuleSet, SupermarketInsights};
use tempfile::NamedTempFile;

pub const HEADER: &str = "Invoice ID,Branch,City,Customer type,Gender,Product line,Unit price,Quantity,Tax 5%,Total,Date,Time,Payment,cogs,gross margin percentage,gross income,Rating";

/// Rows in file order. Three months, three cities, five product lines.
pub const ROWS: [&str; 10] = [
    "750-67-8428,A,Yangon,Member,Female,Health and beauty,74.69,7,26.1415,548.9715,1/5/2019,13:08,Ewallet,522.83,4.761904762,26.1415,9.1",
    "226-31-3081,C,Naypyitaw,Normal,Female,Electronic accessories,15.28,5,3.82,80.22,3/8/2019,10:29,Cash,76.4,4.761904762,3.82,4.2",
    "631-41-3108,A,Yangon,Normal,Male,Home and lifestyle,46.33,7,16.2155,340.5255,3/3/2019,13:23,Credit card,324.31,4.761904762,16.2155,7.4",
    "123-19-1176,A,Yangon,Member,Male,Health and beauty,93.152,5,23.288,489.048,1/27/2019,20:33,Ewallet,465.76,4.761904762,23.288,8.4",
    "373-73-7910,A,Yangon,Normal,Male,Sports and travel,86.31,7,30.2085,634.3785,2/8/2019,10:37,Ewallet,604.17,4.761904762,30.2085,5.3",
    "699-14-3026,C,Naypyitaw,Normal,Male,Electronic accessories,85.39,7,29.8865,627.6165,3/25/2019,18:30,Ewallet,597.73,4.761904762,29.8865,4.1",
    "355-53-5943,A,Yangon,Member,Female,Electronic accessories,68.84,6,20.652,433.692,2/25/2019,14:36,Ewallet,413.04,4.761904762,20.652,5.8",
    "315-22-5665,C,Naypyitaw,Member,Female,Home and lifestyle,73.56,10,36.78,772.38,2/24/2019,11:38,Ewallet,735.6,4.761904762,36.78,8.0",
    "665-32-9167,A,Yangon,Member,Female,Health and beauty,36.26,2,3.626,76.146,1/10/2019,17:15,Credit card,72.52,4.761904762,3.626,7.2",
    "692-92-5582,B,Mandalay,Member,Female,Food and beverages,54.84,3,8.226,172.746,2/20/2019,13:27,Credit card,164.52,4.761904762,8.226,5.9",
];

/// Invoice IDs of [`ROWS`], in file order.
pub const INVOICE_IDS: [&str; 10] = [
    "750-67-8428",
    "226-31-3081",
    "631-41-3108",
    "123-19-1176",
    "373-73-7910",
    "699-14-3026",
    "355-53-5943",
    "315-22-5665",
    "665-32-9167",
    "692-92-5582",
];

/// Write `HEADER` followed by `rows` to a temp CSV file.
pub fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

/// A `Connection` with an offline cache in a temp directory.
///
/// The caller must keep the `TempDir` alive for the duration of the test.
pub fn connection() -> (Connection, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let cache = CacheManager::new(
        Some(tmp_dir.path().to_path_buf()),
        true,
        Duration::from_secs(30),
    )
    .unwrap();
    (Connection::new(cache).unwrap(), tmp_dir)
}

/// Load `csv` through the builder with the given rule set.
pub fn insights_from(csv: &Path, rule_set: RuleSet) -> (SupermarketInsights, tempfile::TempDir) {
    let tmp_dir = tempfile::tempdir().unwrap();
    let insights = SupermarketInsights::builder()
        .source_path(csv)
        .cache_dir(tmp_dir.path())
        .offline(true)
        .rule_set(rule_set)
        .build()
        .unwrap();
    (insights, tmp_dir)
}

/// The sample dataset loaded with the given rule set.
pub fn sample_insights(rule_set: RuleSet) -> (SupermarketInsights, tempfile::TempDir) {
    let csv = write_csv(&ROWS);
    // DuckDB has copied the rows into memory by the time build() returns
    insights_from(csv.path(), rule_set)
}

pub fn ids(rows: &[supermarket_insights::Transaction]) -> Vec<&str> {
    rows.iter().map(|t| t.invoice_id.as_str()).collect()
}

pub fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}
