//! Flat CSV rendering and parsing of record lists

use crate::catalog::Record;
use anyhow::{Context, Result};
use serde_json::Value;
use std::collections::BTreeSet;
use std::path::Path;

/// Column order for a record list: the identifier first (when any record
/// has it), then every other key in lexicographic order.
pub fn column_order(records: &[Record], id_field: &str) -> Vec<String> {
    let mut fields: BTreeSet<&str> = BTreeSet::new();
    for record in records {
        fields.extend(record.keys().map(String::as_str));
    }

    let mut columns = Vec::with_capacity(fields.len());
    if fields.remove(id_field) {
        columns.push(id_field.to_string());
    }
    columns.extend(fields.into_iter().map(str::to_string));
    columns
}

/// Text of one CSV cell. Nested values are kept as compact JSON.
fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Render records as CSV with a header row. An empty list renders as
/// empty text.
pub fn build_csv(records: &[Record], id_field: &str) -> Result<String> {
    if records.is_empty() {
        return Ok(String::new());
    }

    let columns = column_order(records, id_field);
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|c| cell(record.get(c))))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Failed to flush CSV buffer: {}", e.error()))?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

/// Parse header-row CSV into records. Every cell becomes a string and
/// keys follow header order. Short rows leave their trailing keys out;
/// cells beyond the header are dropped.
pub fn parse_csv(text: &str) -> Result<Vec<Record>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers().context("Failed to read CSV header")?.clone();

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row.context("Failed to read CSV row")?;
        let record: Record = headers
            .iter()
            .zip(row.iter())
            .map(|(h, v)| (h.to_string(), Value::String(v.to_string())))
            .collect();
        records.push(record);
    }
    Ok(records)
}

/// Read a CSV file into records
pub fn read_csv(path: &Path) -> Result<Vec<Record>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let records = parse_csv(&text).with_context(|| format!("Failed to parse {}", path.display()))?;
    tracing::debug!("Read {} rows from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn records(values: Vec<Value>) -> Vec<Record> {
        values
            .into_iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[test]
    fn test_short_rows_leave_trailing_fields_out() {
        let parsed = parse_csv("id,city,country\newr,New Jersey\nlhr,London,GB,extra\n").unwrap();
        assert_eq!(parsed.len(), 2);

        let keys: Vec<&str> = parsed[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "city"]);
        assert!(parsed[0].get("country").is_none());

        assert_eq!(parsed[1].len(), 3);
        assert_eq!(parsed[1]["country"], "GB");
    }

    #[test]
    fn test_empty_input_renders_nothing() {
        assert_eq!(build_csv(&[], "id").unwrap(), "");
    }

    #[test]
    fn test_single_plan_header_and_row() {
        let plans = records(vec![json!({
            "id": "vc2-1c-1gb",
            "vcpu_count": 1,
            "ram": 1024,
            "monthly_cost": 5.0,
            "type": "vc2"
        })]);

        let csv = build_csv(&plans, "id").unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "id,monthly_cost,ram,type,vcpu_count");
        assert_eq!(lines[1], "vc2-1c-1gb,5.0,1024,vc2,1");
    }

    #[test]
    fn test_union_of_keys_with_blank_cells() {
        let items = records(vec![
            json!({"name": "Item A", "id": "itm-001", "price": 10}),
            json!({"id": "itm-002", "stock": 30}),
        ]);

        let csv = build_csv(&items, "id").unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "id,name,price,stock");
        assert_eq!(lines[1], "itm-001,Item A,10,");
        assert_eq!(lines[2], "itm-002,,,30");
    }

    #[test]
    fn test_without_identifier_all_columns_sorted() {
        let items = records(vec![json!({"zeta": 1, "alpha": 2})]);
        assert_eq!(column_order(&items, "id"), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_nested_lists_are_quoted_json() {
        let regions = records(vec![json!({
            "id": "ewr",
            "options": ["ddos_protection", "block_storage"]
        })]);

        let csv = build_csv(&regions, "id").unwrap();
        let parsed = parse_csv(&csv).unwrap();
        assert_eq!(
            parsed[0]["options"],
            r#"["ddos_protection","block_storage"]"#
        );
    }

    #[test]
    fn test_parse_keeps_header_order() {
        let parsed = parse_csv("id,city,country\newr,\"New Jersey, NJ\",US\n").unwrap();
        assert_eq!(parsed.len(), 1);
        let keys: Vec<&str> = parsed[0].keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["id", "city", "country"]);
        assert_eq!(parsed[0]["city"], "New Jersey, NJ");
    }
}
