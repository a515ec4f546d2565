//! Grouping and ordering of records

use super::layout::SortKey;
use crate::catalog::Record;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Group key of a record; absent, null and empty values fall into `default`
pub fn group_key(record: &Record, field: &str, default: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => default.to_string(),
    }
}

/// Partition records by `field`. Groups iterate in key order and keep the
/// input order of their members.
pub fn group_records<'a>(
    records: &'a [Record],
    field: &str,
    default: &str,
) -> BTreeMap<String, Vec<&'a Record>> {
    let mut groups: BTreeMap<String, Vec<&Record>> = BTreeMap::new();
    for record in records {
        groups
            .entry(group_key(record, field, default))
            .or_default()
            .push(record);
    }
    groups
}

fn numeric_value(record: &Record, field: &str) -> f64 {
    match record.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn text_value(record: &Record, field: &str) -> String {
    match record.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}

/// Compare two records by a list of sort keys. Missing values compare as
/// zero or the empty string, so they come first.
pub fn compare_records(a: &Record, b: &Record, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ord = if key.numeric {
            numeric_value(a, &key.field).total_cmp(&numeric_value(b, &key.field))
        } else {
            text_value(a, &key.field).cmp(&text_value(b, &key.field))
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Stable sort by the given keys
pub fn sort_records(records: &[Record], keys: &[SortKey]) -> Vec<Record> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| compare_records(a, b, keys));
    sorted
}
