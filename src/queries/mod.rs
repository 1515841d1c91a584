//! Query interfaces for the dashboard.
//!
//! Each query struct borrows from a [`Dataset`](crate::dataset::Dataset) and
//! exposes methods returning plain data or `Result<T>`.

pub mod dashboard;

pub use dashboard::DashboardQuery;
