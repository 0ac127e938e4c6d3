//! Configuration schema for octo.toml and the legacy cli_config.json.
//!
//! Both files share one shape:
//!
//! ```toml
//! url = "https://octopus.example.com"
//! api_key = "API-XXXXXXXX"
//! page_size = 30
//! timeout_secs = 30
//! ```
//!
//! The legacy JSON file spells the key `apikey`.

use std::fmt;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_PAGE_SIZE;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// On-disk configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OctoConfig {
    /// Server base URL
    #[serde(default)]
    pub url: String,

    /// API key sent with every request
    #[serde(default, alias = "apikey")]
    pub api_key: String,

    /// Items requested per collection page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,

    /// Per-request timeout
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl OctoConfig {
    /// Validate the file and turn it into connection settings.
    pub fn into_server_config(self) -> anyhow::Result<ServerConfig> {
        if self.url.trim().is_empty() || self.api_key.trim().is_empty() {
            anyhow::bail!("Missing server_url or api_key in configuration");
        }

        let parsed = url::Url::parse(&self.url)
            .with_context(|| format!("Invalid server_url: '{}'", self.url))?;
        if parsed.cannot_be_a_base() {
            anyhow::bail!("Invalid server_url: '{}' is not a base URL", self.url);
        }

        if self.page_size == Some(0) {
            anyhow::bail!("page_size must be greater than zero");
        }

        Ok(ServerConfig {
            server_url: self.url.trim_end_matches('/').to_string(),
            api_key: self.api_key,
            page_size: self.page_size.unwrap_or(DEFAULT_PAGE_SIZE),
            timeout_secs: self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Validated connection settings handed to the REST client.
#[derive(Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub server_url: String,
    pub api_key: String,
    pub page_size: usize,
    pub timeout_secs: u64,
}

impl ServerConfig {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_key: api_key.into(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("server_url", &self.server_url)
            .field("api_key", &"<redacted>")
            .field("page_size", &self.page_size)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}
