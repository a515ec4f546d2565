//! Catalog Registry - Load category definitions from JSON
//!
//! Every catalog (plans, regions, operating systems) is described by an
//! entry in the embedded `resources/catalog.json`: where it is fetched from,
//! how its files are named and how its documentation is laid out.

use crate::report::ReportLayout;
use serde::Deserialize;
use std::sync::OnceLock;

/// Embedded catalog definitions (compiled into the binary)
const CATALOG_FILE: &str = include_str!("../resources/catalog.json");

/// One catalog category
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDef {
    pub key: String,
    /// Lowercase plural used in progress messages
    pub display_name: String,
    pub endpoint: String,
    /// Key of the record array in the API response
    pub response_path: String,
    pub id_field: String,
    /// Key of this category in the combined JSON export
    pub json_key: String,
    pub file_prefix: String,
    pub doc_file: String,
    pub report: ReportLayout,
}

impl CategoryDef {
    /// File name of a CSV export for a run timestamp
    pub fn csv_file_name(&self, stamp: &str) -> String {
        format!("{}_{}.csv", self.file_prefix, stamp)
    }

    /// Glob matching every CSV export of this category
    pub fn csv_pattern(&self) -> String {
        format!("{}_*.csv", self.file_prefix)
    }
}

/// Root structure of resources/catalog.json
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    /// File prefix of the combined JSON export
    pub resource_prefix: String,
    pub categories: Vec<CategoryDef>,
}

/// Global registry loaded from JSON
static REGISTRY: OnceLock<CatalogConfig> = OnceLock::new();

/// Get the catalog registry (parses the embedded JSON on first access)
pub fn get_registry() -> &'static CatalogConfig {
    REGISTRY.get_or_init(|| {
        serde_json::from_str(CATALOG_FILE)
            .unwrap_or_else(|e| panic!("Failed to parse embedded catalog JSON: {}", e))
    })
}

/// All categories, in processing order
pub fn categories() -> &'static [CategoryDef] {
    &get_registry().categories
}

/// Get a category definition by key
pub fn get_category(key: &str) -> Option<&'static CategoryDef> {
    categories().iter().find(|c| c.key == key)
}
