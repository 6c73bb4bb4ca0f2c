//! SQLite helper utilities for type conversion
//!
//! SQLite has no native UUID or array types. Ids are stored as TEXT, genre
//! lists as JSON arrays in TEXT columns, timestamps as RFC 3339 strings.

use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

/// Generate a fresh row id
#[inline]
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// Serialize a slice to a JSON string for SQLite storage
#[inline]
pub fn vec_to_json<T: Serialize>(v: &[T]) -> String {
    serde_json::to_string(v).unwrap_or_else(|_| "[]".to_string())
}

/// Deserialize a JSON string from SQLite to a Vec
#[inline]
pub fn json_to_vec<T: DeserializeOwned>(s: &str) -> Vec<T> {
    serde_json::from_str(s).unwrap_or_default()
}

/// Get current UTC timestamp as RFC 3339 string for SQLite
#[inline]
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// SQL fragment matching rows whose JSON array column contains the bound value.
pub fn json_array_contains_sql(column: &str) -> String {
    format!("EXISTS (SELECT 1 FROM json_each({}) WHERE value = ?)", column)
}

/// `?, ?, ?` placeholder list for an `IN (...)` clause.
pub fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}
