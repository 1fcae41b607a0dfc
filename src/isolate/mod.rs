//! Content isolation.
//!
//! Reduces a fetched page to the subtree holding its main content:
//!
//! 1. Noise removal (`noise`): scripts, page chrome, ad/sidebar markers and
//!    hidden elements go first.
//! 2. Region choice: a semantic landmark (`landmark`) under the structural
//!    strategy, otherwise readability-style scoring (`scoring`), then the
//!    `dom_smoothie` readability port, then the whole body.
//! 3. Cleanup: link-heavy blocks are pruned, links are unwrapped to their text
//!    and empty blocks dropped.
//!
//! Proxy payloads are already markdown; isolation reduces to
//! [`noise::sanitize_markdown`].

pub mod landmark;
pub mod noise;
pub mod scoring;

use std::fmt;

use dom_query::Document;
use encoding_rs::Encoding;
use tracing::debug;

use crate::dom;
use crate::encoding;
use crate::error::{Error, Result};
use crate::options::{IsolationStrategy, Options};
use crate::result::{PayloadKind, RawDocument};

/// Inline wrappers unwrapped to their text once the region is chosen.
const INLINE_WRAPPERS: &[&str] = &["a", "span", "font"];

/// Leading bytes checked for NUL when sniffing binary payloads.
const BINARY_SNIFF_BYTES: usize = 1024;

/// How the content region was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentSource {
    /// A semantic container (`<article>`, `<main>`, ...).
    Landmark,
    /// The best-scoring candidate and its qualifying siblings.
    Scored,
    /// The `dom_smoothie` readability port.
    Readability,
    /// Nothing scored; the whole (noise-free) body.
    Body,
    /// Markdown pre-rendered by an extraction proxy.
    Proxy,
}

pub(crate) enum ContentBody {
    Tree(Document),
    Markdown(String),
}

/// Main content of a page, ready for normalization.
pub struct IsolatedContent {
    body: ContentBody,
    source: ContentSource,
}

impl IsolatedContent {
    /// How the region was chosen.
    #[must_use]
    pub const fn source(&self) -> ContentSource {
        self.source
    }

    /// Whether the content is proxy markdown rather than an HTML tree.
    #[must_use]
    pub const fn is_markdown(&self) -> bool {
        matches!(self.body, ContentBody::Markdown(_))
    }

    /// Serialized content: the region's HTML, or the sanitized markdown.
    #[must_use]
    pub fn markup(&self) -> String {
        match &self.body {
            ContentBody::Tree(doc) => doc.select("body").inner_html().to_string(),
            ContentBody::Markdown(markdown) => markdown.clone(),
        }
    }

    pub(crate) const fn body(&self) -> &ContentBody {
        &self.body
    }
}

impl fmt::Debug for IsolatedContent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IsolatedContent")
            .field("source", &self.source)
            .field("markup", &self.markup())
            .finish()
    }
}

/// Isolate the main content of a fetched document.
///
/// # Errors
///
/// - [`Error::MalformedInput`] for binary payloads or unsupported content types
/// - [`Error::NoContentFound`] when no text survives isolation
pub fn isolate(raw: &RawDocument, options: &Options) -> Result<IsolatedContent> {
    let kind = payload_kind(raw)?;
    if looks_binary(raw.body()) {
        return Err(Error::MalformedInput("payload contains NUL bytes".into()));
    }
    let text = encoding::decode(raw.declared_charset(), raw.body());

    match kind {
        PayloadKind::Html => isolate_html(&text, options),
        PayloadKind::Markdown => isolate_markdown(&text),
    }
}

/// Isolate the main content of an HTML document.
///
/// # Errors
///
/// Returns [`Error::NoContentFound`] when no text survives isolation.
///
/// # Examples
///
/// ```
/// use web_distill::isolate::{isolate_html, ContentSource};
/// use web_distill::Options;
///
/// let html = "<html><body><nav>Menu</nav><article><p>Hello <a href='/w'>world</a></p></article></body></html>";
/// let content = isolate_html(html, &Options::default()).unwrap();
/// assert_eq!(content.source(), ContentSource::Landmark);
/// assert_eq!(content.markup(), "<article><p>Hello world</p></article>");
/// ```
pub fn isolate_html(html: &str, options: &Options) -> Result<IsolatedContent> {
    let doc = dom::parse(html);
    let removed = noise::strip_noise(&doc);

    let landmark = match options.strategy {
        IsolationStrategy::Structural => landmark::find_landmark(&doc),
        IsolationStrategy::Heuristic => None,
    };

    let (region, source) = if let Some(found) = landmark {
        debug!(selector = found.selector, "content landmark found");
        (found.html, ContentSource::Landmark)
    } else if let Some(region) = scoring::select_region(&doc, options) {
        (region, ContentSource::Scored)
    } else if let Some(region) = readability_region(&doc, options) {
        (region, ContentSource::Readability)
    } else {
        (doc.select("body").inner_html().to_string(), ContentSource::Body)
    };

    let tree = dom::fragment_document(&region);
    let pruned = noise::prune_link_dense(&tree);
    dom::strip_tags(&tree.select("body"), INLINE_WRAPPERS);
    noise::remove_empty_blocks(&tree);

    if !dom::has_text(&tree.select("body")) {
        return Err(Error::NoContentFound);
    }

    debug!(?source, removed, pruned, "content isolated");
    Ok(IsolatedContent {
        body: ContentBody::Tree(tree),
        source,
    })
}

/// Sanitize proxy markdown.
///
/// # Errors
///
/// Returns [`Error::NoContentFound`] when nothing but markup remains.
pub fn isolate_markdown(markdown: &str) -> Result<IsolatedContent> {
    let sanitized = noise::sanitize_markdown(markdown);
    if sanitized.is_empty() {
        return Err(Error::NoContentFound);
    }
    Ok(IsolatedContent {
        body: ContentBody::Markdown(sanitized),
        source: ContentSource::Proxy,
    })
}

/// Payload kind implied by `Content-Type`, falling back to the fetcher's.
fn payload_kind(raw: &RawDocument) -> Result<PayloadKind> {
    let mime = raw
        .content_type()
        .and_then(|ct| ct.split(';').next())
        .map(|m| m.trim().to_ascii_lowercase())
        .unwrap_or_default();

    match mime.as_str() {
        "" => Ok(raw.kind()),
        "text/html" | "application/xhtml+xml" => Ok(PayloadKind::Html),
        "text/markdown" | "text/x-markdown" | "text/plain" => Ok(PayloadKind::Markdown),
        other => Err(Error::MalformedInput(format!("unsupported content type: {other}"))),
    }
}

/// NUL bytes near the start mean the body is not text, unless a BOM
/// announces UTF-16.
fn looks_binary(body: &[u8]) -> bool {
    if Encoding::for_bom(body).is_some() {
        return false;
    }
    body[..body.len().min(BINARY_SNIFF_BYTES)].contains(&0)
}

#[cfg(feature = "readability")]
fn readability_region(doc: &Document, options: &Options) -> Option<String> {
    use dom_smoothie::Readability;

    if !options.use_readability_fallback {
        return None;
    }
    let mut reader = Readability::with_document(doc.clone(), None, None).ok()?;
    let article = reader.parse().ok()?;
    let html = article.content.to_string();
    let has_text = dom::has_text(&dom::parse(&html).select("body"));
    debug!(has_text, "readability fallback consulted");
    has_text.then_some(html)
}

#[cfg(not(feature = "readability"))]
fn readability_region(_doc: &Document, _options: &Options) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn isolate_str(html: &str) -> Result<IsolatedContent> {
        isolate_html(html, &Options::default())
    }

    #[test]
    fn landmark_with_inline_link() {
        let html = "<html><body><article><p>Hello <a href=\"/w\">world</a></p></article></body></html>";
        match isolate_str(html) {
            Ok(content) => {
                assert_eq!(content.source(), ContentSource::Landmark);
                assert_eq!(content.markup(), "<article><p>Hello world</p></article>");
            }
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn empty_body_is_no_content() {
        let result = isolate_str("<html><body></body></html>");
        assert!(matches!(result, Err(Error::NoContentFound)));
    }

    #[test]
    fn chrome_only_page_is_no_content() {
        let html = "<html><body><nav>Home</nav><footer>(c) 2024</footer><script>x()</script></body></html>";
        assert!(matches!(isolate_str(html), Err(Error::NoContentFound)));
    }

    #[test]
    fn header_inside_article_is_removed() {
        let html = "<article><header><h1>Title</h1></header><p>Body text</p></article>";
        match isolate_str(html) {
            Ok(content) => {
                assert!(!content.markup().contains("Title"));
                assert!(content.markup().contains("Body text"));
            }
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn unscored_page_falls_back_to_body() {
        let options = Options {
            use_readability_fallback: false,
            ..Options::default()
        };
        match isolate_html("<div>tiny</div>", &options) {
            Ok(content) => {
                assert_eq!(content.source(), ContentSource::Body);
                assert_eq!(content.markup(), "<div>tiny</div>");
            }
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn binary_payload_is_malformed() {
        let raw = RawDocument::from_html("https://example.com", b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR".to_vec());
        assert!(matches!(isolate(&raw, &Options::default()), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn unsupported_content_type_is_malformed() {
        let raw = RawDocument::new(
            "https://example.com/a.pdf",
            200,
            Some("application/pdf".into()),
            PayloadKind::Html,
            b"%PDF-1.7".to_vec(),
        );
        let err = isolate(&raw, &Options::default()).err();
        assert!(matches!(err, Some(Error::MalformedInput(msg)) if msg.contains("application/pdf")));
    }

    #[test]
    fn plain_text_response_is_treated_as_markdown() {
        let raw = RawDocument::new(
            "https://example.com/notes.txt",
            200,
            Some("text/plain; charset=utf-8".into()),
            PayloadKind::Html,
            b"Just some notes.\n".to_vec(),
        );
        match isolate(&raw, &Options::default()) {
            Ok(content) => {
                assert!(content.is_markdown());
                assert_eq!(content.markup(), "Just some notes.");
            }
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn markup_only_markdown_is_no_content() {
        assert!(matches!(isolate_markdown("![img](/a.png)\n\n"), Err(Error::NoContentFound)));
    }

    #[test]
    fn isolation_is_deterministic() {
        let html = "<body><div class='post'><p>First paragraph of the story, with a comma.</p>\
                    <p>Second paragraph of the story, also with a comma.</p></div>\
                    <div class='sidebar'><p>Unrelated links and things.</p></div></body>";
        let first = isolate_str(html).map(|c| c.markup()).unwrap_or_default();
        let second = isolate_str(html).map(|c| c.markup()).unwrap_or_default();
        assert!(!first.is_empty());
        assert_eq!(first, second);
    }
}
