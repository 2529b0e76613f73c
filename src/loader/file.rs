// Filesystem config loader — reads and parses a JSON configuration file.

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::debug;

use super::traits::ConfigLoader;
use crate::config::AppConfig;

/// Loads configuration from a local JSON file path.
#[derive(Debug, Default)]
pub struct FileConfigLoader;

impl FileConfigLoader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConfigLoader for FileConfigLoader {
    async fn load(&self, locator: &str) -> Result<AppConfig> {
        let raw = tokio::fs::read(locator)
            .await
            .with_context(|| format!("reading config file {}", locator))?;

        let config: AppConfig = serde_json::from_slice(&raw)
            .with_context(|| format!("parsing config file {}", locator))?;

        debug!("config loaded from file {} ({} bytes)", locator, raw.len());
        Ok(config)
    }
}
