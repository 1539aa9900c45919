use crate::domain::config::{PricingConfig, PricingSnapshot};
use crate::domain::ports::ConfigSource;
use crate::error::Result;
use async_trait::async_trait;
use serde::Deserialize;
use std::path::PathBuf;

/// On-disk layout: the config fields plus an optional `version`.
#[derive(Deserialize)]
struct ConfigFile {
    #[serde(default = "default_version")]
    version: u64,
    #[serde(flatten)]
    config: PricingConfig,
}

fn default_version() -> u64 {
    1
}

/// Reads a complete pricing configuration from a JSON file on every load.
///
/// Editing the file between loads is picked up by the next quote; each load
/// parses the whole file, so a snapshot is never partially updated.
#[derive(Debug, Clone)]
pub struct FileConfigSource {
    path: PathBuf,
}

impl FileConfigSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ConfigSource for FileConfigSource {
    async fn load(&self) -> Result<PricingSnapshot> {
        let bytes = tokio::fs::read(&self.path).await?;
        let file: ConfigFile = serde_json::from_slice(&bytes)?;
        file.config.warn_on_coverage_issues();
        tracing::debug!(path = %self.path.display(), version = file.version, "loaded pricing config");
        Ok(PricingSnapshot::new(file.version, file.config))
    }
}
