//! Vultr API interaction module
//!
//! Thin read-only access to the public Vultr v2 catalog endpoints.
//!
//! # Module Structure
//!
//! - [`client`] - Vultr client holding the API root and optional API key
//! - [`http`] - HTTP utilities for REST API calls
//!
//! # Example
//!
//! ```ignore
//! use vultr_catalog::vultr::client::VultrClient;
//!
//! async fn example() -> anyhow::Result<()> {
//!     let client = VultrClient::new(None)?;
//!     let plans = client.get("plans").await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod http;
