//! Records and record-level transforms
//!
//! A record is one catalog entry as an insertion-ordered JSON object.

use crate::error::CatalogError;
use serde_json::{Map, Value};

/// One catalog entry (plan, region or OS image)
pub type Record = Map<String, Value>;

/// Move `id_field` to the front of the record, keeping the relative order
/// of every other key. Records without the field come back untouched.
pub fn normalize(record: Record, id_field: &str) -> Record {
    let Some(id) = record.get(id_field).cloned() else {
        return record;
    };

    let mut reordered = Map::with_capacity(record.len());
    reordered.insert(id_field.to_string(), id);
    reordered.extend(record.into_iter().filter(|(k, _)| k != id_field));
    reordered
}

/// Normalize every record of a list, preserving list order
pub fn normalize_all(records: Vec<Record>, id_field: &str) -> Vec<Record> {
    records
        .into_iter()
        .map(|r| normalize(r, id_field))
        .collect()
}

/// Render a field value as flat text: strings as-is, lists comma-joined,
/// null and absent fields as `None`.
pub fn field_text(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .iter()
                .map(|v| match v {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(", "),
        ),
        object @ Value::Object(_) => Some(object.to_string()),
    }
}

/// Keep records whose field matches one of a set of values
#[derive(Debug, Clone, PartialEq)]
pub struct RecordFilter {
    pub field: String,
    pub values: Vec<String>,
}

impl RecordFilter {
    pub fn new(field: &str, values: Vec<String>) -> Self {
        Self {
            field: field.to_string(),
            values,
        }
    }

    /// Parse `field=value1,value2`
    pub fn parse(text: &str) -> Result<Self, CatalogError> {
        let Some((field, values)) = text.split_once('=') else {
            return Err(CatalogError::InvalidFilter(text.to_string()));
        };

        let field = field.trim();
        let values: Vec<String> = values
            .split(',')
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        if field.is_empty() || values.is_empty() {
            return Err(CatalogError::InvalidFilter(text.to_string()));
        }

        Ok(Self::new(field, values))
    }

    pub fn matches(&self, record: &Record) -> bool {
        field_text(record, &self.field)
            .map(|text| self.values.iter().any(|v| *v == text))
            .unwrap_or(false)
    }

    /// A filter only constrains lists where some record carries its field
    pub fn applies_to(&self, records: &[Record]) -> bool {
        records.iter().any(|r| r.contains_key(&self.field))
    }
}

/// Apply every applicable filter to a record list
pub fn apply_filters(records: Vec<Record>, filters: &[RecordFilter]) -> Vec<Record> {
    let active: Vec<&RecordFilter> = filters.iter().filter(|f| f.applies_to(&records)).collect();
    if active.is_empty() {
        return records;
    }

    records
        .into_iter()
        .filter(|r| active.iter().all(|f| f.matches(r)))
        .collect()
}
