//! Catalog layer
//!
//! Data-driven access to the Vultr catalogs. Category definitions are
//! loaded from JSON at compile time, so a new catalog only needs a new
//! entry in `src/resources/catalog.json`.
//!
//! # Architecture
//!
//! - [`registry`] - Loads and caches category definitions from embedded JSON
//! - [`fetcher`] - Fetches and normalizes category records from the API
//! - [`record`] - The record type, identifier reordering and filters
//!
//! # Example
//!
//! ```ignore
//! use vultr_catalog::catalog::{fetch_records, get_category};
//! use vultr_catalog::vultr::client::VultrClient;
//!
//! async fn list_regions(client: &VultrClient) -> Vec<vultr_catalog::catalog::Record> {
//!     let regions = get_category("regions").unwrap();
//!     fetch_records(client, regions).await
//! }
//! ```

mod fetcher;
pub mod record;
pub mod registry;

pub use fetcher::{extract_records, fetch_records, CatalogSnapshot};
pub use record::{apply_filters, field_text, normalize, normalize_all, Record, RecordFilter};
pub use registry::*;
