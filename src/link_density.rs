//! Link Density Testing
//!
//! Decides whether a block is rich in links (probably boilerplate) and
//! measures link density for candidate scoring.

use dom_query::Selection;

use crate::dom;

/// Single links longer than this, covering nearly all of a block's text,
/// mark the block as a teaser.
const SINGLE_LINK_THRESHOLD: usize = 100;

/// Collect heuristics on link text.
///
/// Returns (total_link_length, num_short_links, non_empty_links)
fn collect_link_info(links: &Selection) -> (usize, usize, usize) {
    let mut link_length = 0;
    let mut n_short_links = 0;
    let mut n_non_empty_links = 0;

    for link in links.iter() {
        let text_length = dom::collapsed_len(&link.text());

        if text_length == 0 {
            continue;
        }

        link_length += text_length;
        if text_length < 10 {
            n_short_links += 1;
        }
        n_non_empty_links += 1;
    }

    (link_length, n_short_links, n_non_empty_links)
}

/// Share of `element`'s text that sits inside `<a>` elements, in `[0, 1]`.
///
/// Elements without text have density 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn link_density(element: &Selection) -> f64 {
    let text_length = dom::collapsed_len(&dom::text_content(element));
    if text_length == 0 {
        return 0.0;
    }
    let (link_length, _, _) = collect_link_info(&element.select("a"));
    (link_length as f64 / text_length as f64).min(1.0)
}

/// Check whether a block should be removed because it is rich in links.
///
/// Short blocks whose text is mostly link text, or whose links are mostly
/// short (menus, tag clouds), qualify. Long prose with a few links does not.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn link_density_test(element: &Selection) -> bool {
    let links = element.select("a");
    let n_links = links.length();

    if n_links == 0 {
        return false;
    }

    let text_length = dom::collapsed_len(&dom::text_content(element));

    // Shortcut for single link
    if n_links == 1 {
        if let Some(link_node) = links.nodes().first() {
            let link_text_length = dom::collapsed_len(&link_node.text());

            if link_text_length > SINGLE_LINK_THRESHOLD
                && (link_text_length as f64) > (text_length as f64) * 0.9
            {
                return true;
            }
        }
    }

    let tag_name = dom::tag_name(element).unwrap_or_default();

    let has_next_sibling = element
        .nodes()
        .first()
        .and_then(dom_query::NodeRef::next_element_sibling)
        .is_some();

    // Prepare limit based on tag and sibling presence
    let limit_length: usize = if tag_name == "p" {
        if has_next_sibling { 30 } else { 60 }
    } else if has_next_sibling {
        100
    } else {
        300
    };

    if text_length < limit_length {
        let (link_length, n_short_links, n_non_empty_links) = collect_link_info(&links);

        if n_non_empty_links == 0 {
            return true;
        }

        // Link text > 80% of total text
        if (link_length as f64) > (text_length as f64) * 0.8 {
            return true;
        }

        // More than 80% of links are short (< 10 chars), typical of menus
        if n_non_empty_links > 1 && (n_short_links as f64) / (n_non_empty_links as f64) > 0.8 {
            return true;
        }
    }

    false
}
