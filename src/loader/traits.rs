use anyhow::Result;
use async_trait::async_trait;

use crate::config::AppConfig;

/// Resolves a configuration locator into an [`AppConfig`].
///
/// The load is a direct asynchronous call; the engine awaits it inline
/// during initialization rather than listening for a readiness signal.
#[async_trait]
pub trait ConfigLoader: Send + Sync {
    async fn load(&self, locator: &str) -> Result<AppConfig>;
}
