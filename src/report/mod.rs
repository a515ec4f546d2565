//! Report generation
//!
//! Turns normalized record lists into flat CSV and sectioned Markdown.
//!
//! - [`csv_format`] - CSV rendering with identifier-first column order, and parsing
//! - [`markdown`] - Markdown documents built from a [`ReportLayout`]
//! - [`group`] - grouping by a categorical field and multi-key ordering
//! - [`layout`] - declarative layout types loaded with the catalog registry

pub mod csv_format;
pub mod group;
pub mod layout;
pub mod markdown;

pub use csv_format::{build_csv, column_order, parse_csv, read_csv};
pub use group::{group_records, sort_records};
pub use layout::{ReportLayout, SortKey};
pub use markdown::build_markdown;
