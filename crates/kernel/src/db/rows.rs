//! Row shapes for executed queries.
//!
//! Rows arrive as JSON objects keyed by column alias. These helpers reshape
//! them into the three forms callers use:
//! - associative rows (`column`)
//! - key → value pairs (`key_pairs`)
//! - values grouped by a key column (`group_by`)

use std::collections::HashMap;
use std::hash::Hash;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// A single result row, keyed by column alias.
pub type JsonRow = serde_json::Map<String, serde_json::Value>;

/// Read and deserialize one column of a row.
pub fn column<T: DeserializeOwned>(row: &JsonRow, name: &str) -> Result<T> {
    let value = row
        .get(name)
        .with_context(|| format!("row is missing column '{name}'"))?;
    serde_json::from_value(value.clone()).with_context(|| format!("invalid value in column '{name}'"))
}

/// Fetch rows as `(key, value)` pairs in row order.
pub fn key_pairs<K, V>(rows: &[JsonRow], key: &str, value: &str) -> Result<Vec<(K, V)>>
where
    K: DeserializeOwned,
    V: DeserializeOwned,
{
    rows.iter()
        .map(|row| Ok((column(row, key)?, column(row, value)?)))
        .collect()
}

/// Group `value` columns by the `key` column, keeping row order within a group.
pub fn group_by<K, V>(rows: &[JsonRow], key: &str, value: &str) -> Result<HashMap<K, Vec<V>>>
where
    K: DeserializeOwned + Eq + Hash,
    V: DeserializeOwned,
{
    let mut grouped: HashMap<K, Vec<V>> = HashMap::new();
    for row in rows {
        let k: K = column(row, key)?;
        let v: V = column(row, value)?;
        grouped.entry(k).or_default().push(v);
    }
    Ok(grouped)
}
