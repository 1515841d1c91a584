use chrono::NaiveDate;

#[derive(Debug, thiserror::Error)]
pub enum InsightsError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid filter range: start {start} is after end {end}")]
    InvalidFilterRange { start: NaiveDate, end: NaiveDate },

    #[error("Cannot compute {0} of an empty collection")]
    EmptyInputStatistics(&'static str),

    #[error("Unknown segment '{name}' for {rule_set} rule set")]
    UnknownSegmentName { name: String, rule_set: String },
}

pub type Result<T> = std::result::Result<T, InsightsError>;
