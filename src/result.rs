//! Documents flowing through the pipeline and its final output.

use serde::Serialize;

/// What kind of payload the fetcher handed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PayloadKind {
    /// Raw HTML, still to be isolated.
    Html,
    /// Pre-rendered markdown (or plain text) from the extraction proxy;
    /// isolation reduces to sanitization.
    Markdown,
}

/// Bytes returned by a fetcher, immutable once built.
#[derive(Debug, Clone)]
pub struct RawDocument {
    url: String,
    status: u16,
    content_type: Option<String>,
    kind: PayloadKind,
    body: Vec<u8>,
}

impl RawDocument {
    /// Build a document from a response.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        status: u16,
        content_type: Option<String>,
        kind: PayloadKind,
        body: Vec<u8>,
    ) -> Self {
        Self {
            url: url.into(),
            status,
            content_type,
            kind,
            body,
        }
    }

    /// HTML document with status 200 and no declared content type.
    #[must_use]
    pub fn from_html(url: impl Into<String>, html: impl Into<Vec<u8>>) -> Self {
        Self::new(url, 200, None, PayloadKind::Html, html.into())
    }

    /// Final URL after redirects.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// HTTP status of the response.
    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    /// `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    /// Payload kind.
    #[must_use]
    pub const fn kind(&self) -> PayloadKind {
        self.kind
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Charset label declared in `Content-Type`, e.g. `"iso-8859-1"`.
    #[must_use]
    pub fn declared_charset(&self) -> Option<&str> {
        let content_type = self.content_type.as_deref()?;
        content_type.split(';').skip(1).find_map(|param| {
            let (key, value) = param.split_once('=')?;
            key.trim()
                .eq_ignore_ascii_case("charset")
                .then(|| value.trim().trim_matches(|c| c == '"' || c == '\''))
        })
    }
}

/// Normalized document text, before truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedText {
    text: String,
    original_length: usize,
}

impl NormalizedText {
    pub(crate) fn new(text: String, original_length: usize) -> Self {
        Self {
            text,
            original_length,
        }
    }

    /// The normalized text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Take ownership of the text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }

    /// Characters of raw text in the isolated content.
    #[must_use]
    pub const fn original_length(&self) -> usize {
        self.original_length
    }

    /// Characters in the normalized text.
    #[must_use]
    pub fn produced_length(&self) -> usize {
        self.text.chars().count()
    }
}

/// Successful result of one extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionResult {
    /// Extracted content, possibly truncated.
    pub content: String,
    /// Characters in `content`.
    pub character_count: usize,
    /// The limit that was enforced, in the requested unit.
    pub limit_applied: usize,
    /// Whether `content` was cut to fit the limit.
    pub truncated: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_charset_from_content_type() {
        let doc = RawDocument::new(
            "https://example.com",
            200,
            Some("text/html; charset=\"ISO-8859-1\"".into()),
            PayloadKind::Html,
            Vec::new(),
        );
        assert_eq!(doc.declared_charset(), Some("ISO-8859-1"));
    }

    #[test]
    fn declared_charset_absent() {
        let doc = RawDocument::new(
            "https://example.com",
            200,
            Some("text/html".into()),
            PayloadKind::Html,
            Vec::new(),
        );
        assert_eq!(doc.declared_charset(), None);
    }

    #[test]
    fn produced_length_counts_chars() {
        let text = NormalizedText::new("Café au lait".into(), 20);
        assert_eq!(text.produced_length(), 12);
        assert_eq!(text.original_length(), 20);
    }

    #[test]
    fn result_serializes_camel_case() {
        let result = ExtractionResult {
            content: "Hello".into(),
            character_count: 5,
            limit_applied: 100,
            truncated: false,
        };
        let json = serde_json::to_value(&result).unwrap_or_default();
        assert_eq!(json["characterCount"], 5);
        assert_eq!(json["limitApplied"], 100);
        assert_eq!(json["truncated"], false);
    }
}
