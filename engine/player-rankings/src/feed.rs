//! Feed documents -> typed rows
//!
//! A feed document must be a JSON array. Individual elements that aren't
//! objects are skipped with a warning; everything inside an object is left
//! for the normalizer to coerce.

use serde_json::Value;
use tracing::warn;

use crate::error::{RankingsError, Result};
use crate::types::{RawRecord, UpdateRow};

/// Rows of a ranking-snapshot document
pub fn snapshot_from_value(feed: &str, document: &Value) -> Result<Vec<RawRecord>> {
    rows_from_value(feed, document, RawRecord::from_value)
}

/// Rows of an annotation-update document
pub fn updates_from_value(feed: &str, document: &Value) -> Result<Vec<UpdateRow>> {
    rows_from_value(feed, document, UpdateRow::from_value)
}

pub fn snapshot_from_str(feed: &str, json: &str) -> Result<Vec<RawRecord>> {
    let document: Value = serde_json::from_str(json)?;
    snapshot_from_value(feed, &document)
}

pub fn updates_from_str(feed: &str, json: &str) -> Result<Vec<UpdateRow>> {
    let document: Value = serde_json::from_str(json)?;
    updates_from_value(feed, &document)
}

fn rows_from_value<T>(feed: &str, document: &Value, convert: fn(&Value) -> Option<T>) -> Result<Vec<T>> {
    let items = document.as_array().ok_or_else(|| RankingsError::NotAList { feed: feed.to_string() })?;

    let rows: Vec<T> = items.iter().filter_map(convert).collect();
    let skipped = items.len() - rows.len();
    if skipped > 0 {
        warn!("Feed '{}': skipped {} non-object rows out of {}", feed, skipped, items.len());
    }

    Ok(rows)
}
