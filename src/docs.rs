//! Documentation updater
//!
//! Regenerates the fixed-name Markdown documents (`PLAN_IDS.md`,
//! `REGION_CODES.md`, `OS_IDS.md`) from the newest CSV export of each
//! category, then removes the consumed CSVs unless asked to keep them.

use crate::catalog::{categories, CategoryDef};
use crate::error::CatalogError;
use crate::report::layout::title_case;
use crate::report::{build_markdown, read_csv, ReportLayout};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Newest file in `dir` whose name matches the glob `pattern`
pub fn find_latest(dir: &Path, pattern: &str) -> Result<PathBuf, CatalogError> {
    let not_found = || CatalogError::NotFound {
        pattern: pattern.to_string(),
        dir: dir.to_path_buf(),
    };

    let full = format!(
        "{}/{}",
        glob::Pattern::escape(&dir.to_string_lossy()),
        pattern
    );
    let paths = glob::glob(&full).map_err(|_| not_found())?;

    paths
        .filter_map(|entry| entry.ok())
        .filter(|path| path.is_file())
        .filter_map(|path| {
            let modified = path.metadata().and_then(|m| m.modified()).ok()?;
            Some((modified, path))
        })
        .max_by_key(|(modified, _): &(SystemTime, PathBuf)| *modified)
        .map(|(_, path)| path)
        .ok_or_else(not_found)
}

/// Outcome of a documentation update
#[derive(Debug, Default)]
pub struct UpdateSummary {
    pub updated: Vec<PathBuf>,
    pub consumed: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub kept: bool,
}

/// Rebuilds the catalog documents from CSV exports
pub struct DocsUpdater {
    pub scripts_dir: PathBuf,
    pub docs_dir: PathBuf,
    /// Overrides the per-category width of extra table cells
    pub max_cell_width: Option<usize>,
}

impl DocsUpdater {
    pub fn new(scripts_dir: impl Into<PathBuf>, docs_dir: impl Into<PathBuf>) -> Self {
        Self {
            scripts_dir: scripts_dir.into(),
            docs_dir: docs_dir.into(),
            max_cell_width: None,
        }
    }

    pub fn with_max_cell_width(mut self, width: Option<usize>) -> Self {
        self.max_cell_width = width;
        self
    }

    fn layout(&self, category: &CategoryDef) -> ReportLayout {
        let mut layout = category.report.clone();
        if let Some(width) = self.max_cell_width {
            layout.sections.max_cell_width = width;
        }
        layout
    }

    /// Regenerate one category document, returning the CSV it was built from
    pub fn update_category(
        &self,
        category: &CategoryDef,
        generated_at: NaiveDateTime,
    ) -> Result<(PathBuf, PathBuf)> {
        let csv_path = find_latest(&self.scripts_dir, &category.csv_pattern())?;
        println!("  Found latest file: {}", display_name(&csv_path));

        let records = read_csv(&csv_path)?;
        println!("  Read {} rows from {}", records.len(), display_name(&csv_path));

        let content = build_markdown(&records, &self.layout(category), generated_at);
        let doc_path = self.docs_dir.join(&category.doc_file);
        std::fs::write(&doc_path, content)
            .with_context(|| format!("Failed to write {}", doc_path.display()))?;
        println!("  Updated: {}", doc_path.display());

        Ok((csv_path, doc_path))
    }

    /// Regenerate every category document in registry order.
    ///
    /// Stops at the first category without a CSV export; documents already
    /// written stay on disk and no CSV is deleted.
    pub fn run(&self, keep_csv: bool) -> Result<UpdateSummary> {
        let generated_at = chrono::Local::now().naive_local();
        let mut summary = UpdateSummary {
            kept: keep_csv,
            ..Default::default()
        };

        for category in categories() {
            println!("Processing {}...", title_case(&category.display_name));
            let (csv_path, doc_path) = self.update_category(category, generated_at)?;
            summary.consumed.push(csv_path);
            summary.updated.push(doc_path);
            println!();
        }

        if keep_csv {
            tracing::info!("Keeping {} CSV files", summary.consumed.len());
            return Ok(summary);
        }

        for csv_path in &summary.consumed {
            match std::fs::remove_file(csv_path) {
                Ok(()) => summary.deleted.push(csv_path.clone()),
                Err(e) => tracing::warn!("Could not delete {}: {}", display_name(csv_path), e),
            }
        }

        Ok(summary)
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::time::Duration;

    #[test]
    fn test_find_latest_picks_newest_mtime() {
        let dir = tempfile::tempdir().unwrap();
        let old = dir.path().join("vultr_plans_20240101_000000.csv");
        let new = dir.path().join("vultr_plans_20230101_000000.csv");
        std::fs::write(&old, "id\n").unwrap();
        std::fs::write(&new, "id\n").unwrap();

        let now = SystemTime::now();
        File::options()
            .write(true)
            .open(&old)
            .unwrap()
            .set_modified(now - Duration::from_secs(3600))
            .unwrap();
        File::options()
            .write(true)
            .open(&new)
            .unwrap()
            .set_modified(now)
            .unwrap();

        assert_eq!(find_latest(dir.path(), "vultr_plans_*.csv").unwrap(), new);
    }

    #[test]
    fn test_find_latest_ignores_other_patterns() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("vultr_regions_1.csv"), "id\n").unwrap();

        let err = find_latest(dir.path(), "vultr_plans_*.csv").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { .. }));
        assert!(err.to_string().contains("vultr_plans_*.csv"));
    }
}
