//! Error types for web-distill.
//!
//! Every stage of the pipeline fails with an [`Error`]. The coordinator tags
//! it with the [`Stage`] that produced it, giving an [`ExtractionFailure`].

use std::fmt;
use std::time::Duration;

use serde::Serialize;

/// Error type for fetch and extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The target is not an absolute http(s) URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// The fetch did not complete within the configured timeout.
    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// DNS, connection, TLS or body-read failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status}")]
    UpstreamHttp {
        /// HTTP status code returned by the upstream server.
        status: u16,
    },

    /// The response body exceeded the configured size cap.
    #[error("response body exceeds {limit} bytes")]
    BodyTooLarge {
        /// Configured maximum body size in bytes.
        limit: usize,
    },

    /// The document was parsed but holds no extractable text.
    #[error("no extractable content found")]
    NoContentFound,

    /// The payload cannot be processed as a document.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// The caller cancelled the request before it completed.
    #[error("request cancelled")]
    Cancelled,

    /// Invalid configuration or request parameters.
    #[error("config error: {0}")]
    Config(String),
}

/// Result type alias for web-distill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Caller-facing error classification.
///
/// Serialized names are the stable wire names used in error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    /// See [`Error::InvalidUrl`].
    #[serde(rename = "InvalidURL")]
    InvalidUrl,
    /// See [`Error::Timeout`].
    Timeout,
    /// See [`Error::Transport`].
    #[serde(rename = "TransportError")]
    Transport,
    /// See [`Error::UpstreamHttp`].
    #[serde(rename = "UpstreamHTTPError")]
    UpstreamHttp,
    /// See [`Error::BodyTooLarge`].
    BodyTooLarge,
    /// See [`Error::NoContentFound`].
    NoContentFound,
    /// See [`Error::MalformedInput`].
    MalformedInput,
    /// See [`Error::Cancelled`].
    Cancelled,
    /// See [`Error::Config`].
    InvalidRequest,
}

impl ErrorKind {
    /// Wire name of this kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidUrl => "InvalidURL",
            Self::Timeout => "Timeout",
            Self::Transport => "TransportError",
            Self::UpstreamHttp => "UpstreamHTTPError",
            Self::BodyTooLarge => "BodyTooLarge",
            Self::NoContentFound => "NoContentFound",
            Self::MalformedInput => "MalformedInput",
            Self::Cancelled => "Cancelled",
            Self::InvalidRequest => "InvalidRequest",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Classification of this error for error responses.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidUrl(_) => ErrorKind::InvalidUrl,
            Self::Timeout(_) => ErrorKind::Timeout,
            Self::Transport(_) => ErrorKind::Transport,
            Self::UpstreamHttp { .. } => ErrorKind::UpstreamHttp,
            Self::BodyTooLarge { .. } => ErrorKind::BodyTooLarge,
            Self::NoContentFound => ErrorKind::NoContentFound,
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Config(_) => ErrorKind::InvalidRequest,
        }
    }
}

/// Pipeline stage in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Request validation, before any network activity.
    Received,
    /// Network fetch (direct or through the extraction proxy).
    Fetching,
    /// Main-content isolation.
    Isolating,
    /// Conversion to markdown or plain text.
    Normalizing,
    /// Size-bounded truncation.
    Truncating,
}

impl Stage {
    /// Lowercase stage name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Fetching => "fetching",
            Self::Isolating => "isolating",
            Self::Normalizing => "normalizing",
            Self::Truncating => "truncating",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal failure of one pipeline run: `Failed{stage, cause}`.
#[derive(Debug, thiserror::Error)]
#[error("{stage} failed: {error}")]
pub struct ExtractionFailure {
    /// Stage that failed.
    pub stage: Stage,
    /// Underlying cause.
    #[source]
    pub error: Error,
}

impl ExtractionFailure {
    /// Tag an error with the stage that produced it.
    #[must_use]
    pub const fn new(stage: Stage, error: Error) -> Self {
        Self { stage, error }
    }

    /// Classification of the underlying cause.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.error.kind()
    }

    /// True when the page could not be retrieved at all.
    ///
    /// False means the page was reachable but could not be turned into a
    /// document (or the request itself was rejected).
    #[must_use]
    pub const fn is_fetch_failure(&self) -> bool {
        matches!(self.stage, Stage::Fetching)
    }

    /// Caller-facing error body.
    #[must_use]
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error_kind: self.kind().as_str().to_string(),
            message: self.error.to_string(),
            stage: self.stage,
        }
    }
}

/// Serialized failure body: `{ "errorKind", "message", "stage" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Wire name of the [`ErrorKind`].
    pub error_kind: String,
    /// Human-readable description.
    pub message: String,
    /// Stage that failed.
    pub stage: Stage,
}
