//! Catalog Fetcher
//!
//! Fetches catalog records from the Vultr API based on category definitions.

use super::record::{normalize_all, Record};
use super::registry::CategoryDef;
use crate::vultr::client::VultrClient;
use crate::vultr::http::format_api_error;
use chrono::NaiveDateTime;
use serde_json::{Map, Value};

/// Fetch and normalize the records of one category.
///
/// Failures are not fatal: they are logged and yield an empty list, so
/// the caller can carry on with the other categories.
pub async fn fetch_records(client: &VultrClient, category: &CategoryDef) -> Vec<Record> {
    let response = match client.get(&category.endpoint).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!(
                "Error fetching {}: {} ({:#})",
                category.endpoint,
                format_api_error(&e),
                e
            );
            return Vec::new();
        }
    };

    let records = extract_records(&response, &category.response_path);
    tracing::info!("Fetched {} {}", records.len(), category.display_name);
    normalize_all(records, &category.id_field)
}

/// Extract records from a response using a dot-notation path
pub fn extract_records(response: &Value, path: &str) -> Vec<Record> {
    let mut current = response;
    for part in path.split('.').filter(|p| !p.is_empty()) {
        current = match current.get(part) {
            Some(v) => v,
            None => {
                tracing::warn!("Response has no '{}' field", path);
                return Vec::new();
            }
        };
    }

    let Some(items) = current.as_array() else {
        tracing::warn!("Response field '{}' is not a list", path);
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::Object(map) => Some(map.clone()),
            other => {
                tracing::warn!("Skipping non-object item in '{}': {}", path, other);
                None
            }
        })
        .collect()
}

/// Records of every category from one run
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub taken_at: NaiveDateTime,
    pub results: Vec<(&'static CategoryDef, Vec<Record>)>,
}

impl CatalogSnapshot {
    pub fn new(taken_at: NaiveDateTime) -> Self {
        Self {
            taken_at,
            results: Vec::new(),
        }
    }

    pub fn push(&mut self, category: &'static CategoryDef, records: Vec<Record>) {
        self.results.push((category, records));
    }

    /// Records of a category, empty when it was not fetched
    pub fn records(&self, key: &str) -> &[Record] {
        self.results
            .iter()
            .find(|(c, _)| c.key == key)
            .map(|(_, r)| r.as_slice())
            .unwrap_or_default()
    }

    /// Combined document: `timestamp` first, then one list per category
    pub fn to_json(&self) -> Value {
        let mut doc = Map::new();
        doc.insert(
            "timestamp".to_string(),
            Value::String(self.taken_at.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()),
        );
        for (category, records) in &self.results {
            doc.insert(
                category.json_key.clone(),
                Value::Array(records.iter().cloned().map(Value::Object).collect()),
            );
        }
        Value::Object(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::registry::get_category;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn test_extract_records_from_top_level_key() {
        let response = json!({
            "plans": [{"id": "vc2-1c-1gb"}, {"id": "vc2-1c-2gb"}],
            "meta": {"total": 2}
        });
        let records = extract_records(&response, "plans");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1]["id"], "vc2-1c-2gb");
    }

    #[test]
    fn test_extract_records_nested_path_and_missing() {
        let response = json!({"data": {"os": [{"id": 387}]}});
        assert_eq!(extract_records(&response, "data.os").len(), 1);
        assert!(extract_records(&response, "regions").is_empty());
        assert!(extract_records(&Value::Null, "plans").is_empty());
    }

    #[test]
    fn test_extract_records_skips_non_objects() {
        let response = json!({"os": [{"id": 387}, "junk", 42]});
        assert_eq!(extract_records(&response, "os").len(), 1);
    }

    #[test]
    fn test_snapshot_json_key_order() {
        let taken_at = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_micro_opt(3, 4, 5, 123456)
            .unwrap();
        let mut snapshot = CatalogSnapshot::new(taken_at);
        snapshot.push(get_category("plans").unwrap(), vec![]);
        snapshot.push(get_category("regions").unwrap(), vec![]);
        snapshot.push(get_category("os").unwrap(), vec![]);

        let doc = snapshot.to_json();
        let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["timestamp", "plans", "regions", "operating_systems"]);
        assert_eq!(doc["timestamp"], "2024-01-02T03:04:05.123456");
    }

    #[test]
    fn test_snapshot_records_lookup() {
        let mut snapshot = CatalogSnapshot::new(chrono::Local::now().naive_local());
        let record = json!({"id": "ewr"}).as_object().cloned().unwrap();
        snapshot.push(get_category("regions").unwrap(), vec![record]);
        assert_eq!(snapshot.records("regions").len(), 1);
        assert!(snapshot.records("plans").is_empty());
    }
}
