//! Vultr catalog retrieval and documentation tooling.
//!
//! Fetches the public plan, region and operating-system catalogs, writes
//! them as timestamped JSON/CSV exports and regenerates Markdown reference
//! documents from those exports.
//!
//! - [`vultr`] - HTTP access to the Vultr v2 API
//! - [`catalog`] - category registry, fetcher and record transforms
//! - [`report`] - CSV and Markdown rendering
//! - [`export`] - timestamped JSON/CSV files for a fetch run
//! - [`docs`] - Markdown documents rebuilt from the newest exports
//! - [`config`] - persisted defaults

pub mod catalog;
pub mod config;
pub mod docs;
pub mod error;
pub mod export;
pub mod report;
pub mod vultr;

pub use error::CatalogError;
