//! Match payload over HTTP, with retries and an optional local fallback.

use super::local::read_payload;
use super::types::MatchPayload;
use super::MatchFeed;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

pub struct HttpFeed {
    client: Client,
    url: String,
    max_retries: u32,
    fallback: Option<PathBuf>,
}

impl HttpFeed {
    pub fn new(url: &str, timeout_ms: u64, max_retries: u32, fallback: Option<PathBuf>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .build()
            .context("failed to build reqwest client")?;

        Ok(Self {
            client,
            url: url.to_string(),
            max_retries,
            fallback,
        })
    }

    async fn fetch_once(&self) -> Result<MatchPayload> {
        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("match API request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            anyhow::bail!("match API HTTP {}: {}", status, body);
        }

        let text = resp.text().await.context("match API response read failed")?;
        MatchPayload::parse(&text)
    }
}

#[async_trait]
impl MatchFeed for HttpFeed {
    async fn fetch_payload(&mut self) -> Result<MatchPayload> {
        let mut last_err = None;
        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                tokio::time::sleep(Duration::from_millis(500 * attempt as u64)).await;
            }

            match self.fetch_once().await {
                Ok(payload) => {
                    tracing::debug!(url = %self.url, count = payload.matches.len(), "fetched matches");
                    return Ok(payload);
                }
                Err(e) => {
                    tracing::warn!(attempt, url = %self.url, error = %e, "match fetch failed");
                    last_err = Some(e);
                }
            }
        }

        if let Some(path) = &self.fallback {
            tracing::warn!(path = %path.display(), "match fetch exhausted retries, using local file");
            return read_payload(path).await;
        }
        Err(last_err.unwrap_or_else(|| anyhow::anyhow!("match fetch failed")))
    }

    fn source_name(&self) -> &str {
        "http"
    }
}
