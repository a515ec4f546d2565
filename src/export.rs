//! Export of fetched catalogs to JSON and CSV files.
//!
//! Every file name carries the run timestamp, so repeated runs never
//! overwrite each other. Write failures are logged and reported back; they
//! do not stop the remaining exports.

use crate::catalog::{get_registry, CatalogSnapshot, Record};
use crate::report::build_csv;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Which files a fetch run writes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    #[default]
    Both,
}

impl OutputFormat {
    pub fn writes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }

    pub fn writes_csv(self) -> bool {
        matches!(self, OutputFormat::Csv | OutputFormat::Both)
    }
}

/// Files written (and not written) by one export
#[derive(Debug, Default)]
pub struct ExportSummary {
    pub written: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl ExportSummary {
    fn record(&mut self, path: PathBuf, result: Result<()>) {
        match result {
            Ok(()) => {
                println!("Data saved to {}", path.display());
                self.written.push(path);
            }
            Err(e) => {
                tracing::error!("Error saving to {}: {:#}", path.display(), e);
                self.failed.push((path, format!("{:#}", e)));
            }
        }
    }
}

/// Pretty-printed JSON, non-ASCII kept as-is
pub fn save_json(value: &Value, path: &Path) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write records as CSV; an empty list writes nothing
pub fn save_csv(records: &[Record], id_field: &str, path: &Path) -> Result<()> {
    let content = build_csv(records, id_field)?;
    std::fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

/// Run timestamp used in file names
pub fn file_stamp(snapshot: &CatalogSnapshot) -> String {
    snapshot.taken_at.format("%Y%m%d_%H%M%S").to_string()
}

/// Write the combined JSON and/or one CSV per non-empty category
pub fn export_snapshot(
    snapshot: &CatalogSnapshot,
    output_dir: &Path,
    format: OutputFormat,
) -> ExportSummary {
    let mut summary = ExportSummary::default();
    let stamp = file_stamp(snapshot);

    if let Err(e) = std::fs::create_dir_all(output_dir) {
        // The individual writes below will fail and be reported
        tracing::error!("Cannot create {}: {}", output_dir.display(), e);
    }

    if format.writes_json() {
        let path = output_dir.join(format!("{}_{}.json", get_registry().resource_prefix, stamp));
        let result = save_json(&snapshot.to_json(), &path);
        summary.record(path, result);
    }

    if format.writes_csv() {
        for (category, records) in &snapshot.results {
            let path = output_dir.join(category.csv_file_name(&stamp));
            if records.is_empty() {
                println!("No data to save to {}", path.display());
                continue;
            }
            let result = save_csv(records, &category.id_field, &path);
            summary.record(path, result);
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::get_category;
    use chrono::NaiveDate;
    use serde_json::json;

    fn snapshot() -> CatalogSnapshot {
        let taken_at = NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(5, 6, 7)
            .unwrap();
        let mut snapshot = CatalogSnapshot::new(taken_at);
        let plan = json!({"id": "vc2-1c-1gb", "monthly_cost": 5.0})
            .as_object()
            .cloned()
            .unwrap();
        snapshot.push(get_category("plans").unwrap(), vec![plan]);
        snapshot.push(get_category("regions").unwrap(), vec![]);
        snapshot
    }

    #[test]
    fn test_export_both_formats() {
        let dir = tempfile::tempdir().unwrap();
        let summary = export_snapshot(&snapshot(), dir.path(), OutputFormat::Both);

        assert!(summary.failed.is_empty());
        let names: Vec<String> = summary
            .written
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            names,
            vec!["vultr_resources_20240304_050607.json", "vultr_plans_20240304_050607.csv"]
        );

        let csv = std::fs::read_to_string(dir.path().join("vultr_plans_20240304_050607.csv")).unwrap();
        assert_eq!(csv, "id,monthly_cost\nvc2-1c-1gb,5.0\n");

        let json: Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("vultr_resources_20240304_050607.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(json["plans"][0]["id"], "vc2-1c-1gb");
        assert_eq!(json["regions"], json!([]));
    }

    #[test]
    fn test_export_json_only() {
        let dir = tempfile::tempdir().unwrap();
        let summary = export_snapshot(&snapshot(), dir.path(), OutputFormat::Json);
        assert_eq!(summary.written.len(), 1);
        assert!(!dir.path().join("vultr_plans_20240304_050607.csv").exists());
    }

    #[test]
    fn test_write_failure_is_reported_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the output directory should be
        let blocked = dir.path().join("not-a-dir");
        std::fs::write(&blocked, "").unwrap();

        let summary = export_snapshot(&snapshot(), &blocked, OutputFormat::Both);
        assert!(summary.written.is_empty());
        assert_eq!(summary.failed.len(), 2);
    }

    #[test]
    fn test_output_format_flags() {
        assert!(OutputFormat::Both.writes_json() && OutputFormat::Both.writes_csv());
        assert!(!OutputFormat::Json.writes_csv());
        assert!(!OutputFormat::Csv.writes_json());
    }
}
