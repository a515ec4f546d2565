//! Vultr Client
//!
//! Main client for the Vultr v2 API, combining the optional API key
//! with the HTTP client and endpoint URL construction.

use super::http::VultrHttpClient;
use anyhow::{Context, Result};
use serde_json::Value;
use url::Url;

/// Public Vultr API root
pub const DEFAULT_BASE_URL: &str = "https://api.vultr.com/v2";

/// Main Vultr client
#[derive(Clone)]
pub struct VultrClient {
    pub http: VultrHttpClient,
    base_url: Url,
    api_key: Option<String>,
}

impl VultrClient {
    /// Create a client against the public API
    pub fn new(api_key: Option<&str>) -> Result<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a client against a custom API root
    pub fn with_base_url(base_url: &str, api_key: Option<&str>) -> Result<Self> {
        // Url::join drops the last segment unless the base ends with a slash
        let normalized = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalized)
            .with_context(|| format!("Invalid API base URL: {}", base_url))?;

        Ok(Self {
            http: VultrHttpClient::new()?,
            base_url,
            api_key: api_key.filter(|k| !k.is_empty()).map(str::to_string),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Build the URL of an endpoint under the API root
    pub fn endpoint_url(&self, endpoint: &str) -> Result<Url> {
        self.base_url
            .join(endpoint.trim_start_matches('/'))
            .with_context(|| format!("Invalid endpoint: {}", endpoint))
    }

    /// GET an endpoint and return the parsed body
    pub async fn get(&self, endpoint: &str) -> Result<Value> {
        let url = self.endpoint_url(endpoint)?;
        self.http.get(url.as_str(), self.api_key.as_deref()).await
    }
}
