//! Client configuration
//!
//! Sources, later wins: defaults, a TOML document, the `CAFETAL_API_BASE`
//! environment variable.

use crate::error::{ClientError, Result};
use serde::{Deserialize, Serialize};

/// Environment variable overriding the base URL
pub const API_BASE_ENV: &str = "CAFETAL_API_BASE";

/// Backend origin used when nothing else is configured
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8080/api/v1";

/// Page size used when walking every page of a listing
pub const DEFAULT_EXPORT_PAGE_SIZE: usize = 100;

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL, without trailing slash
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Page size for full exports
    pub export_page_size: usize,
}

impl ClientConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With base URL
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = normalize_base(&base_url.into());
        self
    }

    /// With timeout
    #[inline]
    #[must_use]
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// With export page size
    #[inline]
    #[must_use]
    pub fn with_export_page_size(mut self, size: usize) -> Self {
        self.export_page_size = size.max(1);
        self
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        let base_url = config.base_url.clone();
        let config = config.with_base_url(base_url);
        config.validate()?;
        Ok(config)
    }

    /// Defaults with the environment override applied
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    /// Apply the `CAFETAL_API_BASE` override, if set and non-empty
    pub fn apply_env(self) -> Result<Self> {
        match std::env::var(API_BASE_ENV) {
            Ok(base) if !base.trim().is_empty() => {
                tracing::debug!("Using {} from environment", API_BASE_ENV);
                let config = self.with_base_url(base.trim());
                config.validate()?;
                Ok(config)
            }
            _ => Ok(self),
        }
    }

    /// Check the base URL parses and the numbers are usable
    pub fn validate(&self) -> Result<()> {
        let url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| ClientError::Config(format!("invalid base_url '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::Config(format!(
                "unsupported scheme '{}' in base_url",
                url.scheme()
            )));
        }
        if self.timeout_secs == 0 {
            return Err(ClientError::Config("timeout_secs must be positive".into()));
        }
        if self.export_page_size == 0 {
            return Err(ClientError::Config("export_page_size must be positive".into()));
        }
        Ok(())
    }

    /// Absolute URL for an API path such as `/warehouses`
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE.to_string(),
            timeout_secs: 30,
            export_page_size: DEFAULT_EXPORT_PAGE_SIZE,
        }
    }
}

fn normalize_base(base: &str) -> String {
    base.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://127.0.0.1:8080/api/v1");
        assert_eq!(config.export_page_size, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_trims_trailing_slash() {
        let config = ClientConfig::new().with_base_url("https://erp.example.pe/api/v1//");
        assert_eq!(config.base_url, "https://erp.example.pe/api/v1");
        assert_eq!(config.endpoint("/warehouses"), "https://erp.example.pe/api/v1/warehouses");
    }

    #[test]
    fn toml_partial_document() {
        let config = ClientConfig::from_toml_str(
            r#"
            base_url = "http://10.0.0.5:9000/api/v1/"
            timeout_secs = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.base_url, "http://10.0.0.5:9000/api/v1");
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.export_page_size, DEFAULT_EXPORT_PAGE_SIZE);
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(ClientConfig::from_toml_str("base_url = \"not a url\"").is_err());
        assert!(ClientConfig::from_toml_str("base_url = \"ftp://host/x\"").is_err());
        assert!(ClientConfig::from_toml_str("timeout_secs = 0").is_err());
        assert!(ClientConfig::from_toml_str("timeout_secs = \"soon\"").is_err());
    }
}
