//! Direct page download.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use super::client::{build_client, check_status, content_type, map_request_error, read_body};
use super::{parse_target_url, Fetcher};
use crate::config::FetcherConfig;
use crate::error::Result;
use crate::result::{PayloadKind, RawDocument};

/// Downloads the page itself; its HTML is isolated locally.
#[derive(Debug, Clone)]
pub struct DirectFetcher {
    client: reqwest::Client,
    timeout: Duration,
    max_body_bytes: usize,
}

impl DirectFetcher {
    /// Build a fetcher from the client settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Config`] if the HTTP client cannot be built.
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(config)?,
            timeout: Duration::from_secs(config.timeout_seconds),
            max_body_bytes: config.max_body_bytes,
        })
    }
}

#[async_trait]
impl Fetcher for DirectFetcher {
    fn name(&self) -> &'static str {
        "direct"
    }

    #[instrument(skip(self), fields(fetcher = "direct"))]
    async fn fetch(&self, url: &str) -> Result<RawDocument> {
        let target = parse_target_url(url)?;

        let response = self
            .client
            .get(target)
            .send()
            .await
            .map_err(|e| map_request_error(&e, self.timeout))?;
        check_status(&response)?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let content_type = content_type(&response);
        let body = read_body(response, self.max_body_bytes, self.timeout).await?;

        debug!(status, bytes = body.len(), final_url = %final_url, "page fetched");
        Ok(RawDocument::new(final_url, status, content_type, PayloadKind::Html, body))
    }
}
