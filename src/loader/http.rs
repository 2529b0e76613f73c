// HTTP config loader — fetches the JSON configuration resource over HTTP.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use super::traits::ConfigLoader;
use crate::config::AppConfig;

/// Loads configuration from an HTTP(S) URL.
#[derive(Debug, Default)]
pub struct HttpConfigLoader {
    client: Client,
}

impl HttpConfigLoader {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

#[async_trait]
impl ConfigLoader for HttpConfigLoader {
    async fn load(&self, locator: &str) -> Result<AppConfig> {
        let resp = self
            .client
            .get(locator)
            .send()
            .await
            .with_context(|| format!("fetching config from {}", locator))?;

        let status = resp.status();
        if !status.is_success() {
            warn!("config fetch failed status={} url={}", status.as_u16(), locator);
            return Err(anyhow!("config fetch failed: HTTP {}", status.as_u16()));
        }

        let body = resp.bytes().await?;
        let config: AppConfig = serde_json::from_slice(&body)
            .with_context(|| format!("parsing config from {}", locator))?;

        debug!("config loaded from {} ({} bytes)", locator, body.len());
        Ok(config)
    }
}
