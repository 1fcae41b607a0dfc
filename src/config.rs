//! Pipeline configuration with sensible defaults.
//!
//! [`PipelineConfig`] is built once at process start and shared read-only by
//! every request. It deserializes from JSON with every field optional.

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::options::Options;
use crate::request::{OutputFormat, DEFAULT_SIZE_LIMIT};

/// Desktop Chrome identity sent on direct fetches.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Public endpoint of the Jina reader, a markdown-rendering extraction proxy.
pub const JINA_READER_BASE: &str = "https://r.jina.ai/";

/// Where pages are fetched from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind")]
pub enum FetchMode {
    /// Fetch the page itself and isolate its content locally.
    #[default]
    Direct,
    /// Ask an extraction proxy for pre-rendered markdown.
    ///
    /// The target URL is appended to `base_url`.
    Proxy {
        /// Proxy endpoint, e.g. [`JINA_READER_BASE`].
        base_url: String,
        /// Bearer token for the proxy, if it requires one.
        #[serde(default)]
        api_key: Option<String>,
    },
}

/// HTTP client settings, fixed for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Whole-request timeout in seconds, body included.
    pub timeout_seconds: u64,
    /// `User-Agent` header.
    pub user_agent: String,
    /// `Accept-Language` header.
    pub accept_language: String,
    /// Largest response body accepted, in bytes.
    pub max_body_bytes: usize,
    /// Redirects followed before giving up.
    pub max_redirects: usize,
    /// Direct fetch or extraction proxy.
    pub mode: FetchMode,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            max_body_bytes: 5 * 1024 * 1024,
            max_redirects: 10,
            mode: FetchMode::Direct,
        }
    }
}

/// Truncation tuning.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct TruncateConfig {
    /// How far back from the hard cut a whitespace boundary may lie, as a
    /// fraction of the limit.
    pub rollback_ratio: f64,
    /// Characters per estimated token.
    pub chars_per_token: usize,
}

impl Default for TruncateConfig {
    fn default() -> Self {
        Self {
            rollback_ratio: 0.10,
            chars_per_token: 4,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// HTTP client settings.
    pub fetcher: FetcherConfig,
    /// Isolation options.
    pub options: Options,
    /// Truncation tuning.
    pub truncate: TruncateConfig,
    /// Limit used when a request does not carry one.
    pub default_limit: Option<usize>,
    /// Format used when a request does not carry one.
    pub default_format: OutputFormat,
}

impl PipelineConfig {
    /// Parse a JSON configuration document and validate it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on malformed JSON or invalid values.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::Config(format!("invalid config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Limit applied to requests without one.
    #[must_use]
    pub fn effective_default_limit(&self) -> usize {
        self.default_limit.unwrap_or(DEFAULT_SIZE_LIMIT)
    }

    /// Validates this configuration.
    ///
    /// Checks:
    /// - `fetcher.timeout_seconds` must be greater than 0
    /// - `fetcher.max_body_bytes` must be greater than 0
    /// - a proxy `base_url` must not be empty
    /// - `default_limit`, when set, must be greater than 0
    /// - `truncate.rollback_ratio` must lie in `[0, 1]`
    /// - `truncate.chars_per_token` must be greater than 0
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.fetcher.timeout_seconds == 0 {
            return Err(Error::Config("timeout_seconds must be greater than 0".into()));
        }
        if self.fetcher.max_body_bytes == 0 {
            return Err(Error::Config("max_body_bytes must be greater than 0".into()));
        }
        if let FetchMode::Proxy { base_url, .. } = &self.fetcher.mode {
            if base_url.trim().is_empty() {
                return Err(Error::Config("proxy base_url must not be empty".into()));
            }
        }
        if self.default_limit == Some(0) {
            return Err(Error::Config("default_limit must be greater than 0".into()));
        }
        if !(0.0..=1.0).contains(&self.truncate.rollback_ratio) {
            return Err(Error::Config("rollback_ratio must be between 0 and 1".into()));
        }
        if self.truncate.chars_per_token == 0 {
            return Err(Error::Config("chars_per_token must be greater than 0".into()));
        }
        Ok(())
    }
}
