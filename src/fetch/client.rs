//! Shared HTTP client construction and response handling.

use std::error::Error as _;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_LENGTH, CONTENT_TYPE};
use tracing::warn;

use crate::config::FetcherConfig;
use crate::error::{Error, Result};

/// `Accept` header sent on direct fetches.
const ACCEPT_HTML: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Build a [`reqwest::Client`] from the fetcher settings.
///
/// The client has:
/// - Whole-request timeout from config
/// - Configured User-Agent and `Accept-Language`
/// - Bounded redirect following
/// - Brotli and gzip decompression
///
/// # Errors
///
/// Returns [`Error::Config`] if the client cannot be constructed.
pub fn build_client(config: &FetcherConfig) -> Result<reqwest::Client> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HTML));
    let language = HeaderValue::from_str(&config.accept_language)
        .map_err(|e| Error::Config(format!("invalid accept_language: {e}")))?;
    headers.insert(ACCEPT_LANGUAGE, language);

    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
        .build()
        .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))
}

/// Map a reqwest failure to a fetch error.
pub fn map_request_error(err: &reqwest::Error, timeout: Duration) -> Error {
    if err.is_timeout() {
        return Error::Timeout(timeout);
    }
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    Error::Transport(message)
}

/// Reject non-2xx responses.
///
/// # Errors
///
/// Returns [`Error::UpstreamHttp`] with the status code.
pub fn check_status(response: &reqwest::Response) -> Result<()> {
    let status = response.status();
    if status.is_success() {
        Ok(())
    } else {
        warn!(status = status.as_u16(), url = %response.url(), "upstream error status");
        Err(Error::UpstreamHttp {
            status: status.as_u16(),
        })
    }
}

/// `Content-Type` header of the response, if readable.
#[must_use]
pub fn content_type(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// Read the body, failing once it exceeds `max_bytes`.
///
/// A declared `Content-Length` over the cap fails before any byte is read;
/// otherwise the body is streamed chunk by chunk.
///
/// # Errors
///
/// - [`Error::BodyTooLarge`] past the cap
/// - [`Error::Timeout`] / [`Error::Transport`] on read failures
pub async fn read_body(
    mut response: reqwest::Response,
    max_bytes: usize,
    timeout: Duration,
) -> Result<Vec<u8>> {
    let declared = response
        .headers()
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok());
    if declared.is_some_and(|len| len > u64::try_from(max_bytes).unwrap_or(u64::MAX)) {
        return Err(Error::BodyTooLarge { limit: max_bytes });
    }

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| map_request_error(&e, timeout))?
    {
        if body.len() + chunk.len() > max_bytes {
            return Err(Error::BodyTooLarge { limit: max_bytes });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}
