use crate::error::Result;
use async_trait::async_trait;
use reel_catalog::models::Configuration;

/// Yields the current image [`Configuration`].
///
/// The pipeline asks once per projection pass, so an implementation that
/// refreshes in the background is picked up on the next pass.
#[async_trait]
pub trait ConfigurationProvider: Send + Sync {
    async fn current(&self) -> Result<Configuration>;
}

/// A configuration that never changes.
#[derive(Debug, Clone)]
pub struct StaticConfiguration {
    configuration: Configuration,
}
impl StaticConfiguration {
    pub fn new(configuration: Configuration) -> Self {
        Self { configuration }
    }
}
impl From<Configuration> for StaticConfiguration {
    fn from(configuration: Configuration) -> Self {
        Self::new(configuration)
    }
}

#[async_trait]
impl ConfigurationProvider for StaticConfiguration {
    async fn current(&self) -> Result<Configuration> {
        Ok(self.configuration.clone())
    }
}
