use std::path::PathBuf;
use thiserror::Error;

/// Conditions callers branch on; everything else travels as `anyhow::Error`.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("No files found matching {pattern} in {}", dir.display())]
    NotFound { pattern: String, dir: PathBuf },

    #[error("Invalid filter '{0}', expected FIELD=VALUE[,VALUE...]")]
    InvalidFilter(String),
}
