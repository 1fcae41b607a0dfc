//! Noise removal.
//!
//! Strips elements that never carry main content (scripts, chrome, ads,
//! hidden nodes) before a region is chosen, and prunes link-heavy or empty
//! blocks from the chosen region afterwards.

use dom_query::{Document, NodeRef, Selection};

use crate::dom;
use crate::link_density::link_density_test;
use crate::patterns::{
    ADVERTISEMENT_TOKEN, HIDDEN_STYLE, HTML_IMG_TAG, MD_IMAGE, MD_LINK, MD_REFERENCE_DEF,
    MD_REFERENCE_LINK,
    MULTIPLE_NEWLINES, NAVIGATION_CLASS, SIDEBAR_CLASS, TRAILING_LINE_WHITESPACE,
};

/// Tags removed with their whole subtree.
pub const NOISE_TAGS: &str = "script, style, noscript, template, iframe, frame, frameset, \
    object, embed, applet, svg, canvas, math, img, picture, video, audio, source, track, map, \
    area, header, footer, nav, aside, button, input, select, textarea, option, label, dialog, \
    link, meta";

/// Landmark roles that mark page chrome.
pub const NOISE_ROLES: &str = r#"[role="navigation"], [role="banner"], [role="contentinfo"],
    [role="complementary"], [role="dialog"], [role="search"]"#;

/// Hidden through attributes.
const HIDDEN_ATTRS: &str = r#"[hidden], [aria-hidden="true"]"#;

/// Elements checked against class/id noise markers.
const MARKER_CANDIDATES: &str = "div, section, ul, ol, li, p, span, ins, table, dl, figure, form";

/// Containers never removed by a marker or hidden-style match.
const LANDMARKS: &str = r#"article, main, [role="main"], [itemprop="articleBody"]"#;

/// Blocks inside the chosen region checked for link density. Prose blocks
/// (`p`, `blockquote`) are never pruned; their links are unwrapped instead.
const LINK_PRUNE_CANDIDATES: &str = "div, section, ul, ol, dl, table, menu";

/// A block needs at least this many links to read as a menu.
const MIN_PRUNED_LINKS: usize = 2;

/// Blocks dropped from the region when they hold no text.
const EMPTY_PRUNE_CANDIDATES: &str =
    "p, div, section, li, ul, ol, dl, blockquote, table, h1, h2, h3, h4, h5, h6";

/// A marker match covering more than this share of the page text is a layout
/// wrapper (`has-sidebar`, `page-with-menu`), not the widget itself.
const MARKER_MAX_TEXT_SHARE: f64 = 0.5;

/// Remove page chrome from `doc` in place.
///
/// Returns the number of elements removed by marker or hidden checks.
pub fn strip_noise(doc: &Document) -> usize {
    dom::remove_matching(doc, NOISE_TAGS);
    dom::remove_matching(doc, NOISE_ROLES);

    let page_text = dom::collapsed_len(&doc.select("body").text());
    let mut removed = 0;

    let hidden = doc.select(HIDDEN_ATTRS).nodes().to_vec();
    for node in hidden.into_iter().rev() {
        if !contains_landmark(&node) {
            Selection::from(node).remove();
            removed += 1;
        }
    }

    let styled = doc.select("[style]").nodes().to_vec();
    for node in styled.into_iter().rev() {
        let sel = Selection::from(node);
        let hidden_style = sel.attr("style").is_some_and(|style| HIDDEN_STYLE.is_match(&style));
        if hidden_style && !contains_landmark(&node) {
            sel.remove();
            removed += 1;
        }
    }

    let marked = doc.select(MARKER_CANDIDATES).nodes().to_vec();
    for node in marked.into_iter().rev() {
        let sel = Selection::from(node);
        if !is_noise_marker(&dom::class_and_id(&sel)) || contains_landmark(&node) {
            continue;
        }
        if is_layout_wrapper(&sel, page_text) {
            continue;
        }
        sel.remove();
        removed += 1;
    }

    removed
}

/// Whether any class or id token names navigation, ads or a sidebar widget.
#[must_use]
pub fn is_noise_marker(class_and_id: &str) -> bool {
    class_and_id.split_whitespace().any(|token| {
        ADVERTISEMENT_TOKEN.is_match(token)
            || NAVIGATION_CLASS.is_match(token)
            || SIDEBAR_CLASS.is_match(token)
    })
}

fn contains_landmark(node: &NodeRef) -> bool {
    let sel = Selection::from(*node);
    let is_landmark = dom::tag_name(&sel).is_some_and(|tag| tag == "article" || tag == "main")
        || sel.attr("role").is_some_and(|role| role.eq_ignore_ascii_case("main"));
    is_landmark || sel.select(LANDMARKS).exists()
}

#[allow(clippy::cast_precision_loss)]
fn is_layout_wrapper(sel: &Selection, page_text: usize) -> bool {
    if page_text == 0 {
        return false;
    }
    let own = dom::collapsed_len(&sel.text());
    own as f64 > page_text as f64 * MARKER_MAX_TEXT_SHARE
}

/// Remove link lists and menus nested inside the region roots of `fragment`.
///
/// Region roots (direct children of `<body>`) are never removed here, and
/// neither is a block with a single link.
pub fn prune_link_dense(fragment: &Document) -> usize {
    let candidates = fragment.select("body").select(LINK_PRUNE_CANDIDATES).nodes().to_vec();
    let mut removed = 0;
    for node in candidates.into_iter().rev() {
        if is_region_root(&node) {
            continue;
        }
        let sel = Selection::from(node);
        if sel.select("a").length() >= MIN_PRUNED_LINKS && link_density_test(&sel) {
            sel.remove();
            removed += 1;
        }
    }
    removed
}

fn is_region_root(node: &NodeRef) -> bool {
    node.parent()
        .and_then(|parent| dom::node_tag(&parent))
        .is_some_and(|tag| tag == "body")
}

/// Drop blocks that hold no text once noise is gone.
pub fn remove_empty_blocks(fragment: &Document) {
    let candidates = fragment.select("body").select(EMPTY_PRUNE_CANDIDATES).nodes().to_vec();
    for node in candidates.into_iter().rev() {
        let sel = Selection::from(node);
        if !dom::has_text(&sel) {
            sel.remove();
        }
    }
}

/// Clean markdown returned by an extraction proxy.
///
/// Images are dropped, inline and reference links reduced to their text,
/// reference definitions removed and blank-line runs collapsed.
///
/// # Examples
///
/// ```
/// use web_distill::isolate::noise::sanitize_markdown;
///
/// let md = "# Title\n\n![logo](/l.png)\n\nRead [the post](https://x.dev/p).\n\n\n\n[1]: https://x.dev";
/// assert_eq!(sanitize_markdown(md), "# Title\n\nRead the post.");
/// ```
#[must_use]
pub fn sanitize_markdown(markdown: &str) -> String {
    let text = markdown.replace("\r\n", "\n");
    let text = HTML_IMG_TAG.replace_all(&text, "");
    let text = MD_IMAGE.replace_all(&text, "");
    let text = MD_LINK.replace_all(&text, "$1");
    let text = MD_REFERENCE_LINK.replace_all(&text, "$1");
    let text = MD_REFERENCE_DEF.replace_all(&text, "");
    let text = TRAILING_LINE_WHITESPACE.replace_all(&text, "");
    let text = MULTIPLE_NEWLINES.replace_all(&text, "\n\n");
    text.trim().to_string()
}
