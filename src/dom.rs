//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate shared by the isolator and the
//! normalizers. Tag names are always compared in lowercase.

pub use dom_query::{Document, NodeRef, Selection};

pub use tendril::StrTendril;

/// Block-level tags: their boundaries separate text runs.
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "dialog", "div", "dl",
    "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6",
    "header", "hr", "html", "li", "main", "nav", "ol", "p", "pre", "section", "summary", "table",
    "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

// === Attribute Operations ===

/// Get element ID attribute
#[inline]
#[must_use]
pub fn id(sel: &Selection) -> Option<String> {
    sel.attr("id").map(|s| s.to_string())
}

/// Get element class attribute
#[inline]
#[must_use]
pub fn class_name(sel: &Selection) -> Option<String> {
    sel.attr("class").map(|s| s.to_string())
}

/// Class and id joined with a space, for pattern matching.
#[must_use]
pub fn class_and_id(sel: &Selection) -> String {
    match (class_name(sel), id(sel)) {
        (Some(class), Some(id)) => format!("{class} {id}"),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => String::new(),
    }
}

// === Tag/Node Information ===

/// Get tag name (lowercase)
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes().first().and_then(node_tag)
}

/// Lowercase tag name of an element node.
#[must_use]
pub fn node_tag(node: &NodeRef) -> Option<String> {
    node.node_name().map(|t| t.to_ascii_lowercase())
}

/// Whether `tag` starts a new block of text.
#[inline]
#[must_use]
pub fn is_block_tag(tag: &str) -> bool {
    BLOCK_TAGS.contains(&tag)
}

/// Heading level for `h1`..`h6`.
#[must_use]
pub fn heading_level(tag: &str) -> Option<usize> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Element children of `node`, skipping text and comments.
#[must_use]
pub fn element_children<'a>(node: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
    node.children().into_iter().filter(NodeRef::is_element).collect()
}

/// Whether any element child of `node` is block-level.
#[must_use]
pub fn has_block_children(node: &NodeRef) -> bool {
    element_children(node)
        .iter()
        .filter_map(node_tag)
        .any(|tag| is_block_tag(&tag))
}

// === Text Content ===

/// Get all text content of node and descendants
///
/// Returns `StrTendril` for zero-copy passing.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Character count of `text` once whitespace runs collapse to single spaces
/// and the ends are trimmed.
#[must_use]
pub fn collapsed_len(text: &str) -> usize {
    let mut words = 0usize;
    let mut chars = 0usize;
    for word in text.split_whitespace() {
        words += 1;
        chars += word.chars().count();
    }
    chars + words.saturating_sub(1)
}

/// Whether `sel` holds any non-whitespace text.
#[must_use]
pub fn has_text(sel: &Selection) -> bool {
    sel.text().chars().any(|c| !c.is_whitespace())
}

// === Tree Manipulation ===

/// Remove every element matching `selector`.
pub fn remove_matching(doc: &Document, selector: &str) {
    doc.select(selector).remove();
}

/// Remove elements but keep their children (unwrap)
#[inline]
pub fn strip_tags(sel: &Selection, tags: &[&str]) {
    sel.strip_elements(tags);
}

// === Parsing ===

/// Parse HTML string into document
#[inline]
#[must_use]
pub fn parse(html: &str) -> Document {
    Document::from(html)
}

/// Wrap an HTML fragment in a fresh document body.
#[must_use]
pub fn fragment_document(html: &str) -> Document {
    Document::from(format!("<html><body>{html}</body></html>"))
}
