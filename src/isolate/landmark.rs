//! Structural landmark shortcut.
//!
//! When a page marks its content with semantic containers, the container is
//! taken as-is and no scoring runs.

use dom_query::{Document, NodeRef, Selection};

use crate::dom;

/// Containers tried after `<article>`, most specific first.
const FALLBACK_LANDMARKS: &[&str] = &[r#"[itemprop="articleBody"]"#, "main", r#"[role="main"]"#];

/// A landmark chosen as the content region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landmark {
    /// Selector that matched.
    pub selector: &'static str,
    /// Outer HTML of the matched element.
    pub html: String,
}

/// Find the semantic container holding the main content.
///
/// A single top-level `<article>` with text wins. Listing pages with several
/// articles fall through to `[itemprop=articleBody]`, `<main>` and
/// `[role=main]`, in that order. Returns `None` when no landmark holds text.
#[must_use]
pub fn find_landmark(doc: &Document) -> Option<Landmark> {
    let articles: Vec<NodeRef> = doc
        .select("article")
        .nodes()
        .iter()
        .filter(|node| !has_ancestor(node, "article"))
        .filter(|node| dom::has_text(&Selection::from(**node)))
        .copied()
        .collect();

    if let [article] = articles.as_slice() {
        return Some(Landmark {
            selector: "article",
            html: Selection::from(*article).html().to_string(),
        });
    }

    FALLBACK_LANDMARKS.iter().copied().find_map(|selector| {
        doc.select(selector)
            .iter()
            .find(dom::has_text)
            .map(|sel| Landmark {
                selector,
                html: sel.html().to_string(),
            })
    })
}

fn has_ancestor(node: &NodeRef, tag: &str) -> bool {
    let mut current = node.parent();
    while let Some(parent) = current {
        if dom::node_tag(&parent).is_some_and(|t| t == tag) {
            return true;
        }
        current = parent.parent();
    }
    false
}
