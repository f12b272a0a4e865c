//! Configuration types for the Meilisearch transport.

use std::env;

/// Default Meilisearch URL.
const DEFAULT_MEILISEARCH_HOST: &str = "http://localhost:7700";

/// Connection settings for the Meilisearch transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeilisearchConfig {
    /// Base URL of the engine.
    pub host: String,
    /// API key sent as a bearer token. `None` for unsecured instances.
    pub api_key: Option<String>,
}

impl Default for MeilisearchConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_MEILISEARCH_HOST.to_string(),
            api_key: None,
        }
    }
}

impl MeilisearchConfig {
    /// Create a config for `host` without an API key.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            api_key: None,
        }
    }

    /// Set the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Read the config from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `MEILISEARCH_HOST`: engine URL (default: http://localhost:7700)
    /// - `MEILISEARCH_KEY`: API key (default: none; empty counts as none)
    pub fn from_env() -> Self {
        let host =
            env::var("MEILISEARCH_HOST").unwrap_or_else(|_| DEFAULT_MEILISEARCH_HOST.to_string());
        let api_key = env::var("MEILISEARCH_KEY").ok().filter(|key| !key.is_empty());

        Self { host, api_key }
    }
}
