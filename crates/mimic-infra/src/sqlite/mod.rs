//! SQLite storage layer.
//!
//! Repository implementations backed by SQLite with WAL mode and split
//! read/write connection pools.

pub mod history;
pub mod persona;
pub mod pool;
pub mod profile;

use chrono::{DateTime, Utc};

use mimic_types::error::RepositoryError;
use mimic_types::profile::AttributeMap;

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

fn parse_attributes(s: &str) -> Result<AttributeMap, RepositoryError> {
    serde_json::from_str(s).map_err(|e| RepositoryError::Query(format!("invalid attributes: {e}")))
}

fn format_attributes(map: &AttributeMap) -> Result<String, RepositoryError> {
    serde_json::to_string(map).map_err(|e| RepositoryError::Query(e.to_string()))
}
