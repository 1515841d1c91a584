//! DuckDB connection wrapper: CSV registration, typed loading, raw SQL.
//!
//! The sales CSV is read with every column as VARCHAR and a `row_id`
//! recording file order. Typed [`Transaction`]s are produced by a single
//! SELECT that casts numerics and normalizes dates to ISO text.

use crate::cache::CacheManager;
use crate::config;
use crate::error::Result;
use crate::models::Transaction;
use crate::sql_builder::SqlBuilder;
use chrono::NaiveDate;
use duckdb::{types::ValueRef, Connection as DuckDbConnection};
use serde::de::DeserializeOwned;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, warn};

/// Days between 0001-01-01 (CE day 1) and the Unix epoch.
const UNIX_EPOCH_CE_DAYS: i32 = 719_163;

/// Wraps an in-memory DuckDB connection holding the `sales` table.
pub struct Connection {
    conn: DuckDbConnection,
    /// The cache manager used to locate the dataset file.
    pub cache: RefCell<CacheManager>,
    registered: Cell<bool>,
}

impl Connection {
    /// Create a connection backed by the given cache.
    ///
    /// Opens an in-memory DuckDB database.
    pub fn new(cache: CacheManager) -> Result<Self> {
        let conn = DuckDbConnection::open_in_memory()?;
        Ok(Self {
            conn,
            cache: RefCell::new(cache),
            registered: Cell::new(false),
        })
    }

    /// Create (or replace) the `sales` table from a CSV file.
    pub fn register_csv(&self, csv_path: &Path) -> Result<()> {
        // Use forward slashes for DuckDB compatibility
        let path_str = csv_path.to_string_lossy().replace('\\', "/").replace('\'', "''");
        self.conn.execute_batch(&format!(
            "CREATE OR REPLACE TABLE {} AS \
             SELECT row_number() OVER () AS row_id, * \
             FROM read_csv('{}', header = true, all_varchar = true)",
            config::SALES_TABLE,
            path_str
        ))?;
        self.registered.set(true);
        info!(path = %path_str, table = config::SALES_TABLE, "registered sales table");
        Ok(())
    }

    /// Whether [`register_csv`](Self::register_csv) has run.
    pub fn has_sales(&self) -> bool {
        self.registered.get()
    }

    /// Load every row of the `sales` table as a [`Transaction`], in file order.
    ///
    /// Rows whose date matches none of [`config::DATE_FORMATS`] are skipped.
    pub fn load_transactions(&self) -> Result<Vec<Transaction>> {
        let date_expr = date_expression();

        let (count_sql, count_params) = SqlBuilder::new(config::SALES_TABLE)
            .select(&["COUNT(*)"])
            .where_clause(&format!("{} IS NULL", date_expr), &[])
            .build();
        let skipped = self
            .execute_scalar(&count_sql, &count_params)?
            .and_then(|v| v.as_i64())
            .unwrap_or(0);
        if skipped > 0 {
            warn!(skipped, "skipping sales rows with unparseable dates");
        }

        let mut columns: Vec<String> = config::sales_columns()
            .iter()
            .map(|(header, alias)| column_expression(header, alias))
            .collect();
        columns.push(format!("{} AS date", date_expr));
        let column_refs: Vec<&str> = columns.iter().map(String::as_str).collect();

        let (sql, params) = SqlBuilder::new(config::SALES_TABLE)
            .select(&column_refs)
            .where_clause(&format!("{} IS NOT NULL", date_expr), &[])
            .order_by(&["row_id ASC"])
            .build();

        let rows: Vec<Transaction> = self.execute_into(&sql, &params)?;
        debug!(rows = rows.len(), "loaded transactions");
        Ok(rows)
    }

    /// Execute SQL and return results as a `Vec` of `HashMap`s.
    ///
    /// Each row is represented as a `HashMap<String, serde_json::Value>`.
    pub fn execute(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<HashMap<String, serde_json::Value>>> {
        let mut stmt = self.conn.prepare(sql)?;

        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        // Column metadata is only available after execution
        let column_names: Vec<String> = match rows.as_ref() {
            Some(s) => s.column_names().into_iter().map(|s| s.to_string()).collect(),
            None => Vec::new(),
        };

        let mut out: Vec<HashMap<String, serde_json::Value>> = Vec::new();

        while let Some(row) = rows.next()? {
            let mut map = HashMap::with_capacity(column_names.len());
            for (i, col_name) in column_names.iter().enumerate() {
                map.insert(col_name.clone(), convert_value_ref(row.get_ref(i)?));
            }
            out.push(map);
        }

        Ok(out)
    }

    /// Execute SQL and deserialize each row into type `T`.
    pub fn execute_into<T: DeserializeOwned>(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Vec<T>> {
        let rows = self.execute(sql, params)?;
        let mut results = Vec::with_capacity(rows.len());
        for row in rows {
            let value = serde_json::Value::Object(row.into_iter().collect());
            results.push(serde_json::from_value(value)?);
        }
        Ok(results)
    }

    /// Execute SQL and return the first column of the first row.
    ///
    /// Returns `None` if the result set is empty.
    pub fn execute_scalar(
        &self,
        sql: &str,
        params: &[String],
    ) -> Result<Option<serde_json::Value>> {
        let mut stmt = self.conn.prepare(sql)?;
        let param_values: Vec<&dyn duckdb::ToSql> =
            params.iter().map(|p| p as &dyn duckdb::ToSql).collect();

        let mut rows = stmt.query(param_values.as_slice())?;

        if let Some(row) = rows.next()? {
            Ok(Some(convert_value_ref(row.get_ref(0)?)))
        } else {
            Ok(None)
        }
    }

    /// Access the underlying DuckDB connection for advanced usage.
    pub fn raw(&self) -> &DuckDbConnection {
        &self.conn
    }
}

/// Select expression for one CSV column, cast to the type `Transaction` expects.
fn column_expression(header: &str, alias: &str) -> String {
    match alias {
        "quantity" => format!("CAST(TRIM(\"{}\") AS INTEGER) AS {}", header, alias),
        "unit_price" | "total" | "gross_income" | "rating" => {
            format!("CAST(TRIM(\"{}\") AS DOUBLE) AS {}", header, alias)
        }
        _ => format!("TRIM(\"{}\") AS {}", header, alias),
    }
}

/// `Date` column parsed with each accepted format and rendered as `YYYY-MM-DD`.
fn date_expression() -> String {
    let attempts: Vec<String> = config::DATE_FORMATS
        .iter()
        .map(|fmt| format!("TRY_STRPTIME(TRIM(\"Date\"), '{}')", fmt))
        .collect();
    format!("strftime(COALESCE({}), '%Y-%m-%d')", attempts.join(", "))
}

/// Convert a DuckDB `ValueRef` to a `serde_json::Value`.
fn convert_value_ref(val: ValueRef<'_>) -> serde_json::Value {
    match val {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Boolean(b) => serde_json::Value::Bool(b),
        ValueRef::TinyInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::SmallInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::Int(n) => serde_json::Value::Number(n.into()),
        ValueRef::BigInt(n) => serde_json::Value::Number(n.into()),
        ValueRef::HugeInt(n) => match i64::try_from(n) {
            Ok(i) => serde_json::Value::Number(i.into()),
            Err(_) => serde_json::Value::String(n.to_string()),
        },
        ValueRef::Float(f) => serde_json::Number::from_f64(f as f64)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Double(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(bytes) => {
            serde_json::Value::String(String::from_utf8_lossy(bytes).to_string())
        }
        ValueRef::Date32(days) => days
            .checked_add(UNIX_EPOCH_CE_DAYS)
            .and_then(NaiveDate::from_num_days_from_ce_opt)
            .map(|d| serde_json::Value::String(d.format("%Y-%m-%d").to_string()))
            .unwrap_or(serde_json::Value::Null),
        // Remaining temporal and nested types are not part of the sales schema
        _ => serde_json::Value::Null,
    }
}
