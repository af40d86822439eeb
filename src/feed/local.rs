//! Bundled JSON file used when no API endpoint is configured.

use super::types::MatchPayload;
use super::MatchFeed;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub struct LocalFeed {
    path: PathBuf,
}

impl LocalFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

pub(crate) async fn read_payload(path: &Path) -> Result<MatchPayload> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read match file: {}", path.display()))?;
    MatchPayload::parse(&text).with_context(|| format!("in {}", path.display()))
}

#[async_trait]
impl MatchFeed for LocalFeed {
    async fn fetch_payload(&mut self) -> Result<MatchPayload> {
        let payload = read_payload(&self.path).await?;
        tracing::debug!(path = %self.path.display(), count = payload.matches.len(), "loaded local matches");
        Ok(payload)
    }

    fn source_name(&self) -> &str {
        "local"
    }
}
