//! Fetchers: retrieve raw page bytes for a URL.
//!
//! - [`DirectFetcher`] downloads the page itself.
//! - [`ProxyFetcher`] asks an extraction proxy (e.g. the Jina reader) for
//!   pre-rendered markdown.
//!
//! Both share one [`reqwest::Client`] per fetcher; clients pool connections,
//! so a fetcher should live as long as the process.

pub mod client;
mod direct;
mod proxy;

use std::sync::Arc;

use async_trait::async_trait;
use url::Url;

pub use direct::DirectFetcher;
pub use proxy::ProxyFetcher;

use crate::config::{FetchMode, FetcherConfig};
use crate::error::{Error, Result};
use crate::result::RawDocument;

/// Retrieves a document for a URL.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Fetch `url`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] when `url` is not an absolute http(s) URL
    /// - [`Error::Timeout`] / [`Error::Transport`] on network failures
    /// - [`Error::UpstreamHttp`] on non-2xx responses
    /// - [`Error::BodyTooLarge`] past the configured body cap
    async fn fetch(&self, url: &str) -> Result<RawDocument>;
}

/// Build the fetcher selected by `config.mode`.
///
/// # Errors
///
/// Returns [`Error::Config`] if the HTTP client cannot be constructed.
pub fn build_fetcher(config: &FetcherConfig) -> Result<Arc<dyn Fetcher>> {
    Ok(match &config.mode {
        FetchMode::Direct => Arc::new(DirectFetcher::new(config)?),
        FetchMode::Proxy { base_url, api_key } => {
            Arc::new(ProxyFetcher::new(config, base_url.clone(), api_key.clone())?)
        }
    })
}

/// Parse and validate a target URL.
///
/// Only absolute `http`/`https` URLs with a host are accepted.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] otherwise.
///
/// # Examples
///
/// ```
/// use web_distill::fetch::parse_target_url;
///
/// assert!(parse_target_url("https://example.com/post").is_ok());
/// assert!(parse_target_url("ftp://example.com/file").is_err());
/// assert!(parse_target_url("/relative/path").is_err());
/// ```
pub fn parse_target_url(url: &str) -> Result<Url> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("empty URL".into()));
    }

    let parsed = Url::parse(trimmed).map_err(|e| Error::InvalidUrl(format!("{trimmed}: {e}")))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Error::InvalidUrl(format!(
            "unsupported scheme {}: {trimmed}",
            parsed.scheme()
        )));
    }
    if parsed.host().is_none() {
        return Err(Error::InvalidUrl(format!("missing host: {trimmed}")));
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_http_and_https() {
        assert!(parse_target_url("http://example.com").is_ok());
        assert!(parse_target_url("  https://example.com/a?b=c  ").is_ok());
    }

    #[test]
    fn rejects_non_http_schemes() {
        for url in ["ftp://example.com", "mailto:someone@example.com", "javascript:alert(1)", "file:///etc/hosts"] {
            assert!(matches!(parse_target_url(url), Err(Error::InvalidUrl(_))), "{url}");
        }
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(parse_target_url(""), Err(Error::InvalidUrl(_))));
        assert!(matches!(parse_target_url("not a url"), Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn builds_fetcher_per_mode() {
        let direct = build_fetcher(&FetcherConfig::default()).map(|f| f.name());
        assert_eq!(direct.ok(), Some("direct"));

        let config = FetcherConfig {
            mode: FetchMode::Proxy {
                base_url: "https://r.jina.ai/".into(),
                api_key: None,
            },
            ..FetcherConfig::default()
        };
        assert_eq!(build_fetcher(&config).map(|f| f.name()).ok(), Some("proxy"));
    }
}
