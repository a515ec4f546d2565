//! Configuration Management
//!
//! Handles persistent defaults for vultr-catalog. The API key is never
//! stored; it comes from `--api-key` or `VULTR_API_KEY`.

use crate::vultr::client::DEFAULT_BASE_URL;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "VULTR_API_KEY";

/// User configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// API root, for mirrors and tests
    #[serde(default)]
    pub base_url: Option<String>,
    /// Where `fetch` writes its files
    #[serde(default)]
    pub output_dir: Option<PathBuf>,
    /// Where `update-docs` looks for CSV exports
    #[serde(default)]
    pub scripts_dir: Option<PathBuf>,
    /// Where `update-docs` writes the Markdown documents
    #[serde(default)]
    pub docs_dir: Option<PathBuf>,
    /// Overrides the width limit of extra Markdown table cells
    #[serde(default)]
    pub max_cell_width: Option<usize>,
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vultr-catalog").join("config.json"))
    }

    /// Load configuration from disk
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    /// Load from a specific file; missing or unreadable files give defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring malformed config {}: {}", path.display(), e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        let Some(path) = Self::config_path() else {
            return Ok(());
        };
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Create parent directory
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;

        Ok(())
    }

    /// Get effective API key (CLI > environment)
    pub fn effective_api_key(&self, cli: Option<&str>) -> Option<String> {
        cli.map(str::to_string)
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|k| !k.is_empty())
    }

    /// Get effective API root (CLI > config > public API)
    pub fn effective_base_url(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.base_url.clone())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
    }

    /// Get effective output directory (CLI > config > current directory)
    pub fn effective_output_dir(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// Get effective CSV directory (CLI > config > ./scripts)
    pub fn effective_scripts_dir(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.scripts_dir.clone())
            .unwrap_or_else(|| PathBuf::from("./scripts"))
    }

    /// Get effective docs directory (CLI > config > current directory)
    pub fn effective_docs_dir(&self, cli: Option<&Path>) -> PathBuf {
        cli.map(Path::to_path_buf)
            .or_else(|| self.docs_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

/// Mask all but the last four characters of a secret
pub fn mask_secret(secret: &str) -> String {
    let count = secret.chars().count();
    if count <= 4 {
        return "*".repeat(count);
    }
    let tail: String = secret.chars().skip(count - 4).collect();
    format!("{}{}", "*".repeat(count - 4), tail)
}
