//! Plain-text flattening.
//!
//! Block boundaries become single spaces, whitespace runs collapse, and the
//! result is one trimmed line. Inline elements join their text directly, so
//! `<b>bold</b>.` stays `bold.`.

use dom_query::{NodeRef, Selection};
use regex::Captures;

use crate::dom;
use crate::patterns::{MD_EMPHASIS, MD_LINE_MARKER, MD_LIST_MARKER, MD_RULE_LINE, WHITESPACE_NORMALIZE};

/// Deeper subtrees contribute their raw text.
const MAX_FLATTEN_DEPTH: usize = 512;

/// Flatten the children of `root` to a single line of text.
///
/// # Examples
///
/// ```
/// use web_distill::dom;
/// use web_distill::normalize::text::flatten;
///
/// let doc = dom::parse("<h1>Title</h1><p>Some <em>styled</em> text.</p><ul><li>a</li><li>b</li></ul>");
/// assert_eq!(flatten(&doc.select("body")), "Title Some styled text. a b");
/// ```
#[must_use]
pub fn flatten(root: &Selection) -> String {
    let mut out = String::new();
    if let Some(node) = root.nodes().first() {
        collect(&mut out, node, 0);
    }
    collapse_whitespace(&out)
}

fn collect(out: &mut String, node: &NodeRef, depth: usize) {
    for child in node.children() {
        if child.is_text() {
            out.push_str(&child.text());
        } else if child.is_element() {
            if depth >= MAX_FLATTEN_DEPTH {
                out.push(' ');
                out.push_str(&child.text());
                out.push(' ');
                continue;
            }
            let tag = dom::node_tag(&child).unwrap_or_default();
            let boundary = tag == "br" || dom::is_block_tag(&tag);
            if boundary {
                out.push(' ');
            }
            collect(out, &child, depth + 1);
            if boundary {
                out.push(' ');
            }
        }
    }
}

/// Flatten proxy markdown: markup is dropped, escapes resolved, whitespace
/// collapsed.
///
/// # Examples
///
/// ```
/// use web_distill::normalize::text::flatten_markdown;
///
/// let md = "# Title\n\n- **one**\n- two\n\n> quoted \\*literal\\*";
/// assert_eq!(flatten_markdown(md), "Title one two quoted *literal*");
/// ```
#[must_use]
pub fn flatten_markdown(markdown: &str) -> String {
    let text = MD_RULE_LINE.replace_all(markdown, "");
    let text = MD_LINE_MARKER.replace_all(&text, "");
    let text = MD_LIST_MARKER.replace_all(&text, "");
    let text = MD_EMPHASIS.replace_all(&text, |caps: &Captures| {
        caps.get(1).map_or_else(String::new, |literal| literal.as_str().to_string())
    });
    let text = text.replace('|', " ");
    collapse_whitespace(&text)
}

/// Collapse whitespace runs to single spaces and trim.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(html: &str) -> String {
        let doc = dom::parse(html);
        flatten(&doc.select("body"))
    }

    #[test]
    fn single_paragraph_unchanged() {
        assert_eq!(text("<p>Hello world</p>"), "Hello world");
    }

    #[test]
    fn block_boundaries_become_spaces() {
        assert_eq!(text("<div>One</div><div>Two</div><p>Three<br>Four</p>"), "One Two Three Four");
    }

    #[test]
    fn inline_elements_join_directly() {
        assert_eq!(text("<p>This is <strong>bold</strong>.</p>"), "This is bold.");
    }

    #[test]
    fn newlines_and_tabs_collapse() {
        assert_eq!(text("<p>  spaced\n\n\tout  </p>"), "spaced out");
    }

    #[test]
    fn table_cells_are_separated() {
        assert_eq!(text("<table><tr><td>a</td><td>b</td></tr></table>"), "a b");
    }

    #[test]
    fn markdown_tables_and_rules_flatten() {
        let md = "| A | B |\n| --- | --- |\n| 1 | 2 |\n\n---\n\n1. x";
        assert_eq!(flatten_markdown(md), "A B 1 2 x");
    }

    #[test]
    fn markdown_snake_case_survives() {
        assert_eq!(flatten_markdown("use my_var here"), "use my_var here");
    }
}
