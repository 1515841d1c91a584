use std::path::PathBuf;
use std::time::Duration;

/// Location of the sales CSV when no source is configured.
pub const DEFAULT_DATASET_PATH: &str = "data/supermarket_sales_raw.csv";

/// File name used for a downloaded copy of a remote dataset.
pub const CACHED_DATASET_FILE: &str = "supermarket_sales.csv";

/// Records which remote URL the cached copy came from.
pub const SOURCE_MARKER_FILE: &str = "source.txt";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Name of the DuckDB table the CSV is registered as.
pub const SALES_TABLE: &str = "sales";

/// Accepted textual date formats, tried in order.
pub const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// CSV header -> column alias for every field the loader reads.
pub fn sales_columns() -> [(&'static str, &'static str); 12] {
    [
        ("Invoice ID", "invoice_id"),
        ("Branch", "branch"),
        ("City", "city"),
        ("Customer type", "customer_type"),
        ("Gender", "gender"),
        ("Product line", "product_line"),
        ("Unit price", "unit_price"),
        ("Quantity", "quantity"),
        ("Total", "total"),
        ("Payment", "payment"),
        ("gross income", "gross_income"),
        ("Rating", "rating"),
    ]
}

pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = dirs::cache_dir() {
        cache.join("supermarket-insights")
    } else {
        PathBuf::from(".supermarket-insights-cache")
    }
}
