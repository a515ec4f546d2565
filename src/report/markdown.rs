//! Markdown documentation rendering
//!
//! Produces the sectioned catalog documents: title, summary, optional
//! table of contents, a quick-reference table over every record and one
//! detail table per group.

use super::group::{group_records, sort_records};
use super::layout::{column_header, AnchorSet, CellFormat, ColumnDef, ReportLayout};
use crate::catalog::Record;
use chrono::NaiveDateTime;
use serde_json::Value;
use std::collections::BTreeSet;

/// Placeholder for absent values
pub const MISSING: &str = "N/A";

/// Appended to truncated cells
pub const ELLIPSIS: &str = "...";

/// Line buffer for a Markdown document
#[derive(Default)]
struct MarkdownDoc {
    lines: Vec<String>,
}

impl MarkdownDoc {
    fn line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn blank(&mut self) {
        self.lines.push(String::new());
    }

    fn heading(&mut self, level: usize, text: &str) {
        self.line(format!("{} {}", "#".repeat(level), text));
        self.blank();
    }

    fn table(&mut self, headers: &[String], rows: impl IntoIterator<Item = Vec<String>>) {
        self.line(format!("| {} |", headers.join(" | ")));
        self.line(format!("|{}|", vec!["---"; headers.len()].join("|")));
        for row in rows {
            self.line(format!("| {} |", row.join(" | ")));
        }
        self.blank();
    }

    fn finish(mut self) -> String {
        if self.lines.last().map_or(true, |l| !l.is_empty()) {
            self.blank();
        }
        self.lines.join("\n")
    }
}

/// Cut text longer than `max` characters, ending it with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max <= ELLIPSIS.len() {
        return text.chars().take(max).collect();
    }
    let keep = max.saturating_sub(ELLIPSIS.len());
    let mut out: String = text.chars().take(keep).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Pipes would split the cell
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

fn list_item(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Flatten list-like values: JSON arrays, or text that looks like one
/// (`["a","b"]` or `['a', 'b']` as found in CSV cells).
fn flatten_list(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(list_item).collect::<Vec<_>>().join(", "),
        Value::String(s) if s.trim_start().starts_with('[') => {
            match serde_json::from_str::<Vec<Value>>(s) {
                Ok(items) => items.iter().map(list_item).collect::<Vec<_>>().join(", "),
                Err(_) => s
                    .trim()
                    .trim_start_matches('[')
                    .trim_end_matches(']')
                    .replace(['\'', '"'], ""),
            }
        }
        other => list_item(other),
    }
}

/// Value text, `None` when absent, null or empty
fn present(record: &Record, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        value => Some(list_item(value)),
    }
}

/// Render one pinned cell
fn format_cell(record: &Record, column: &ColumnDef) -> String {
    let text = match column.format {
        CellFormat::MegabytesAsGb => {
            let mb: f64 = present(record, &column.field)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0.0);
            format!("{:.1}", mb / 1024.0)
        }
        CellFormat::List => match record.get(&column.field) {
            Some(value) => {
                let flat = flatten_list(value);
                if flat.is_empty() {
                    MISSING.to_string()
                } else {
                    flat
                }
            }
            None => MISSING.to_string(),
        },
        CellFormat::Code => match present(record, &column.field) {
            Some(v) => format!("`{}`", v),
            None => MISSING.to_string(),
        },
        CellFormat::Money => match present(record, &column.field) {
            Some(v) => format!("${}", v),
            None => MISSING.to_string(),
        },
        CellFormat::Plain => present(record, &column.field).unwrap_or_else(|| MISSING.to_string()),
    };
    escape_cell(&text)
}

/// Render one extra (non-pinned) cell, truncated to `max_width`
fn format_extra_cell(record: &Record, field: &str, max_width: usize) -> String {
    let text = match record.get(field) {
        Some(Value::Null) | None => MISSING.to_string(),
        Some(value) => list_item(value),
    };
    escape_cell(&truncate(&text, max_width))
}

/// Extra columns of a group: every key not pinned or hidden, alphabetical
fn extra_fields(records: &[&Record], layout: &ReportLayout) -> Vec<String> {
    if !layout.sections.extra_columns {
        return Vec::new();
    }
    let mut fields = BTreeSet::new();
    for record in records {
        for key in record.keys() {
            if !layout.sections.is_pinned(key) {
                fields.insert(key.clone());
            }
        }
    }
    fields.into_iter().collect()
}

/// Render a catalog document. Never fails; an empty record list yields a
/// document that reports zero records.
pub fn build_markdown(
    records: &[Record],
    layout: &ReportLayout,
    generated_at: NaiveDateTime,
) -> String {
    let mut doc = MarkdownDoc::default();

    doc.heading(1, &layout.title);
    doc.line(format!(
        "*Last updated: {}*",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    doc.blank();
    doc.line(layout.description.as_str());
    doc.blank();

    let sorted = sort_records(records, &layout.sort_keys);
    let groups = group_records(&sorted, &layout.group_by, &layout.default_group);

    doc.heading(2, "Summary");
    doc.line(format!("- **{}:** {}", layout.total_label, records.len()));
    doc.line(format!("- **{}:** {}", layout.group_label, groups.len()));
    doc.blank();

    let toc = layout.toc.as_ref().filter(|_| !groups.is_empty());

    // Section anchors depend on every heading rendered before them
    let mut anchors = AnchorSet::default();
    for heading in [Some(layout.title.as_str()), Some("Summary")]
        .into_iter()
        .chain([toc.map(|t| t.heading.as_str())])
        .chain([Some(layout.quick_reference.heading.as_str())])
        .flatten()
    {
        anchors.next(heading);
    }
    let section_anchors: Vec<String> = groups
        .keys()
        .map(|key| anchors.next(&layout.sections.heading(key)))
        .collect();

    if let Some(toc) = toc {
        doc.heading(2, &toc.heading);
        for ((key, members), anchor) in groups.iter().zip(&section_anchors) {
            let label = layout.sections.heading_style.apply(key);
            doc.line(format!(
                "- [{}](#{}) ({} {})",
                label,
                anchor,
                members.len(),
                toc.count_label
            ));
        }
        doc.blank();
    }

    doc.heading(2, &layout.quick_reference.heading);
    if sorted.is_empty() {
        doc.line("_No records available._");
        doc.blank();
    } else {
        let columns = &layout.quick_reference.columns;
        let headers: Vec<String> = columns.iter().map(|c| c.header.clone()).collect();
        doc.table(
            &headers,
            sorted
                .iter()
                .map(|r| columns.iter().map(|c| format_cell(r, c)).collect::<Vec<_>>()),
        );
    }

    let sections = &layout.sections;
    for (key, members) in &groups {
        doc.heading(2, &sections.heading(key));

        let extras = extra_fields(members, layout);
        let headers: Vec<String> = sections
            .primary_columns
            .iter()
            .map(|c| c.header.clone())
            .chain(extras.iter().map(|f| column_header(f)))
            .collect();

        doc.table(
            &headers,
            members.iter().map(|r| {
                sections
                    .primary_columns
                    .iter()
                    .map(|c| format_cell(r, c))
                    .chain(
                        extras
                            .iter()
                            .map(|f| format_extra_cell(r, f, sections.max_cell_width)),
                    )
                    .collect::<Vec<_>>()
            }),
        );
    }

    if !layout.usage.is_empty() {
        doc.heading(2, "Usage in Terraform");
        doc.line("```hcl");
        for line in &layout.usage {
            doc.line(line.as_str());
        }
        doc.line("```");
        doc.blank();
    }

    for line in &layout.appendix {
        doc.line(line.as_str());
    }

    doc.finish()
}
