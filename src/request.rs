//! Caller-facing request types.

use serde::{Deserialize, Serialize};

/// Default size limit when a request does not name one.
pub const DEFAULT_SIZE_LIMIT: usize = 10_000;

/// Unit in which a size limit is expressed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LimitUnit {
    /// Unicode scalar values (`char`s).
    #[default]
    #[serde(alias = "characters", alias = "chars")]
    Characters,
    /// Estimated tokens, converted to a character count before cutting.
    #[serde(alias = "approx_tokens", alias = "tokens")]
    ApproxTokens,
}

impl std::str::FromStr for LimitUnit {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "chars" | "characters" => Ok(Self::Characters),
            "tokens" | "approxtokens" | "approx_tokens" => Ok(Self::ApproxTokens),
            other => Err(crate::Error::Config(format!("unknown limit unit: {other}"))),
        }
    }
}

/// Representation produced by the normalizer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown with ATX (`#`) headings.
    #[default]
    Markdown,
    /// Flattened text; tag boundaries become single spaces.
    #[serde(alias = "plaintext", alias = "plain")]
    Text,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "text" | "plain" | "plaintext" => Ok(Self::Text),
            other => Err(crate::Error::Config(format!("unknown output format: {other}"))),
        }
    }
}

/// A single extraction request.
///
/// `limit` and `format` fall back to the pipeline defaults when absent.
///
/// # Example
///
/// ```rust
/// use web_distill::{FetchRequest, LimitUnit};
///
/// let request = FetchRequest::new("https://example.com/post")
///     .with_limit(2_000)
///     .with_unit(LimitUnit::ApproxTokens);
/// assert_eq!(request.limit, Some(2_000));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    /// Absolute http(s) URL of the page.
    pub url: String,
    /// Size limit; must be greater than zero when present.
    #[serde(default, alias = "sizeLimit", alias = "max_length")]
    pub limit: Option<usize>,
    /// Unit of `limit`.
    #[serde(default, alias = "limitUnit")]
    pub unit: LimitUnit,
    /// Output representation.
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl FetchRequest {
    /// Request for `url` with default limit, unit and format.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            limit: None,
            unit: LimitUnit::Characters,
            format: None,
        }
    }

    /// Set the size limit.
    #[must_use]
    pub const fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the unit of the size limit.
    #[must_use]
    pub const fn with_unit(mut self, unit: LimitUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Set the output format.
    #[must_use]
    pub const fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = Some(format);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_minimal_request() {
        let request: FetchRequest =
            serde_json::from_str(r#"{"url": "https://example.com"}"#).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(request, FetchRequest::new("https://example.com"));
    }

    #[test]
    fn deserializes_wire_aliases() {
        let request: FetchRequest = serde_json::from_str(
            r#"{"url": "https://example.com", "sizeLimit": 500, "limitUnit": "tokens", "format": "text"}"#,
        )
        .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(request.limit, Some(500));
        assert_eq!(request.unit, LimitUnit::ApproxTokens);
        assert_eq!(request.format, Some(OutputFormat::Text));
    }

    #[test]
    fn parses_units_and_formats_from_cli_strings() {
        assert_eq!("tokens".parse::<LimitUnit>().ok(), Some(LimitUnit::ApproxTokens));
        assert_eq!("Chars".parse::<LimitUnit>().ok(), Some(LimitUnit::Characters));
        assert!("bytes".parse::<LimitUnit>().is_err());
        assert_eq!("md".parse::<OutputFormat>().ok(), Some(OutputFormat::Markdown));
        assert_eq!("plain".parse::<OutputFormat>().ok(), Some(OutputFormat::Text));
    }
}
