//! Report layouts
//!
//! Declarative description of how one catalog renders as Markdown. Layouts
//! are part of the embedded category definitions (see `catalog::registry`).

use serde::Deserialize;
use std::collections::HashMap;

/// How a single table cell is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellFormat {
    #[default]
    Plain,
    /// Wrapped in backticks
    Code,
    /// Prefixed with `$`
    Money,
    /// Megabyte count shown as gigabytes with one decimal
    MegabytesAsGb,
    /// List-like values flattened to `a, b`
    List,
}

/// A pinned table column
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnDef {
    pub header: String,
    pub field: String,
    #[serde(default)]
    pub format: CellFormat,
}

/// One component of the record ordering
#[derive(Debug, Clone, Deserialize)]
pub struct SortKey {
    pub field: String,
    /// Compare as numbers instead of text
    #[serde(default)]
    pub numeric: bool,
}

impl SortKey {
    pub fn text(field: &str) -> Self {
        Self {
            field: field.to_string(),
            numeric: false,
        }
    }

    pub fn numeric(field: &str) -> Self {
        Self {
            field: field.to_string(),
            numeric: true,
        }
    }
}

/// How a raw group key becomes a section heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingStyle {
    #[default]
    AsIs,
    Upper,
    Title,
}

impl HeadingStyle {
    pub fn apply(self, key: &str) -> String {
        match self {
            HeadingStyle::AsIs => key.to_string(),
            HeadingStyle::Upper => key.to_uppercase(),
            HeadingStyle::Title => title_case(key),
        }
    }
}

/// Table of contents listing every group with its size
#[derive(Debug, Clone, Deserialize)]
pub struct TocLayout {
    pub heading: String,
    /// Noun after the count, e.g. "plans" in "(12 plans)"
    pub count_label: String,
}

/// Per-group detail sections
#[derive(Debug, Clone, Deserialize)]
pub struct SectionLayout {
    #[serde(default)]
    pub heading_style: HeadingStyle,
    #[serde(default)]
    pub heading_suffix: String,
    pub primary_columns: Vec<ColumnDef>,
    /// Fields never shown as extra columns
    #[serde(default)]
    pub hidden_fields: Vec<String>,
    #[serde(default = "default_true")]
    pub extra_columns: bool,
    /// Extra cells longer than this are cut with an ellipsis
    #[serde(default = "default_max_cell_width")]
    pub max_cell_width: usize,
}

impl SectionLayout {
    pub fn heading(&self, key: &str) -> String {
        format!("{}{}", self.heading_style.apply(key), self.heading_suffix)
    }

    pub fn is_pinned(&self, field: &str) -> bool {
        self.primary_columns.iter().any(|c| c.field == field)
            || self.hidden_fields.iter().any(|h| h == field)
    }
}

/// Flat table over all records
#[derive(Debug, Clone, Deserialize)]
pub struct QuickReference {
    pub heading: String,
    pub columns: Vec<ColumnDef>,
}

/// Complete Markdown layout for one catalog
#[derive(Debug, Clone, Deserialize)]
pub struct ReportLayout {
    pub title: String,
    pub description: String,
    pub group_by: String,
    /// Group for records lacking `group_by`
    pub default_group: String,
    pub total_label: String,
    pub group_label: String,
    pub sort_keys: Vec<SortKey>,
    #[serde(default)]
    pub toc: Option<TocLayout>,
    pub quick_reference: QuickReference,
    pub sections: SectionLayout,
    /// HCL snippet for the "Usage in Terraform" block
    #[serde(default)]
    pub usage: Vec<String>,
    /// Literal Markdown appended at the end
    #[serde(default)]
    pub appendix: Vec<String>,
}

fn default_true() -> bool {
    true
}

fn default_max_cell_width() -> usize {
    30
}

/// Capitalize the first letter of every word, lowercase the rest.
/// Any non-alphabetic character starts a new word.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_alpha = false;
    for c in s.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Header for a non-pinned column: `monthly_cost` -> `Monthly Cost`
pub fn column_header(field: &str) -> String {
    title_case(&field.replace('_', " "))
}

/// GitHub-style anchor of a heading: `VC2 Plans` -> `vc2-plans`
pub fn heading_anchor(heading: &str) -> String {
    heading
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}

/// Anchors of a document's headings in order. Repeats get `-1`, `-2`, ...
/// the way GitHub numbers them.
#[derive(Debug, Default)]
pub struct AnchorSet {
    seen: HashMap<String, usize>,
}

impl AnchorSet {
    pub fn next(&mut self, heading: &str) -> String {
        let base = heading_anchor(heading);
        let count = self.seen.entry(base.clone()).or_insert(0);
        let anchor = match *count {
            0 => base,
            n => format!("{}-{}", base, n),
        };
        *count += 1;
        anchor
    }
}
