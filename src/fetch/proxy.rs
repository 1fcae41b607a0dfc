//! Extraction-proxy fetch.
//!
//! The proxy fetches and renders the page remotely; the target URL is
//! appended to the proxy base (`https://r.jina.ai/https://example.com`).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use tracing::{debug, instrument};

use super::client::{build_client, check_status, content_type, map_request_error, read_body};
use super::{parse_target_url, Fetcher};
use crate::config::FetcherConfig;
use crate::error::Result;
use crate::result::{PayloadKind, RawDocument};

/// Fetches pre-rendered markdown from an extraction proxy.
#[derive(Debug, Clone)]
pub struct ProxyFetcher {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    max_body_bytes: usize,
}

impl ProxyFetcher {
    /// Build a proxy fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: &FetcherConfig, base_url: String, api_key: Option<String>) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            timeout: Duration::from_secs(config.timeout_seconds),
            max_body_bytes: config.max_body_bytes,
        })
    }

    /// Proxy URL for `target`.
    #[must_use]
    pub fn proxy_url(&self, target: &str) -> String {
        format!("{}{target}", self.base_url)
    }
}

#[async_trait]
impl Fetcher for ProxyFetcher {
    fn name(&self) -> &'static str {
        "proxy"
    }

    #[instrument(skip(self), fields(fetcher = "proxy"))]
    async fn fetch(&self, url: &str) -> Result<RawDocument> {
        let target = parse_target_url(url)?;

        let mut request = self
            .client
            .get(self.proxy_url(target.as_str()))
            .header(ACCEPT, "text/markdown");
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {key}"));
        }

        let response = request
            .send()
            .await
            .map_err(|e| map_request_error(&e, self.timeout))?;
        check_status(&response)?;

        let status = response.status().as_u16();
        let content_type = content_type(&response);
        let body = read_body(response, self.max_body_bytes, self.timeout).await?;

        debug!(status, bytes = body.len(), "proxy markdown fetched");
        Ok(RawDocument::new(
            target.to_string(),
            status,
            content_type,
            PayloadKind::Markdown,
            body,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn proxy_url_appends_target() {
        let fetcher = ProxyFetcher::new(&FetcherConfig::default(), "https://r.jina.ai/".into(), None);
        let url = fetcher.map(|f| f.proxy_url("https://example.com/a"));
        assert_eq!(url.ok().as_deref(), Some("https://r.jina.ai/https://example.com/a"));
    }

    #[test]
    fn blank_api_key_is_dropped() {
        let fetcher =
            ProxyFetcher::new(&FetcherConfig::default(), "https://r.jina.ai/".into(), Some("  ".into()));
        assert!(fetcher.is_ok_and(|f| f.api_key.is_none()));
    }
}
