pub mod http;
pub mod local;
pub mod types;

use crate::config::FeedConfig;
use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use types::MatchPayload;

#[async_trait]
pub trait MatchFeed: Send + Sync {
    async fn fetch_payload(&mut self) -> Result<MatchPayload>;
    fn source_name(&self) -> &str;
}

/// Blank API URL selects the bundled local file.
pub fn build_feed(config: &FeedConfig) -> Result<Box<dyn MatchFeed>> {
    let url = config.effective_api_url();
    if url.is_empty() {
        return Ok(Box::new(local::LocalFeed::new(&config.local_path)));
    }
    let fallback = config
        .fallback_to_local
        .then(|| PathBuf::from(&config.local_path));
    Ok(Box::new(http::HttpFeed::new(
        &url,
        config.request_timeout_ms,
        config.max_retries,
        fallback,
    )?))
}
