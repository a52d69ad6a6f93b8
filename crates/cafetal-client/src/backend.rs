//! Transport abstraction
//!
//! [`Backend`] is the seam between typed API calls and the wire. Production
//! code uses [`HttpBackend`]; tests plug in canned responses.

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// Something that can answer `GET <path>?<query>` with JSON
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch and parse one JSON document
    async fn get_json(&self, path: &str, query: &[(&'static str, String)]) -> Result<Value>;

    /// Backend name, for logs
    fn name(&self) -> &str;
}

/// reqwest-based backend
#[derive(Debug, Clone)]
pub struct HttpBackend {
    config: ClientConfig,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Build a backend from validated configuration
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClientError::Config(format!("http client: {e}")))?;
        Ok(Self { config, client })
    }

    /// Configuration in use
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn get_json(&self, path: &str, query: &[(&'static str, String)]) -> Result<Value> {
        let url = self.config.endpoint(path);
        tracing::debug!("GET {} {:?}", url, query);

        let resp = self.client.get(&url).query(query).send().await?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("GET {} failed with HTTP {}", url, status.as_u16());
            return Err(ClientError::Http {
                status: status.as_u16(),
            });
        }
        Ok(resp.json::<Value>().await?)
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_config() {
        let config = ClientConfig::new().with_base_url("::nope::");
        assert!(matches!(HttpBackend::new(config), Err(ClientError::Config(_))));
    }

    #[test]
    fn keeps_config() {
        let backend = HttpBackend::new(ClientConfig::default()).unwrap();
        assert_eq!(backend.name(), "http");
        assert_eq!(backend.config().timeout_secs, 30);
    }
}
