//! HTML tree to markdown.
//!
//! Block elements become blocks separated by a blank line; headings use ATX
//! (`#`) syntax. Inline text is whitespace-collapsed, and escaped only where
//! it would otherwise read as markup.

use dom_query::{NodeRef, Selection};

use crate::dom;
use crate::markdown::{
    escape_line_start, escape_markdown, fence_code, inline_code, is_layout_table,
    table_to_markdown,
};

/// Deeper subtrees are emitted as plain text.
const MAX_RENDER_DEPTH: usize = 512;

/// Render the children of `root` as markdown.
///
/// # Examples
///
/// ```
/// use web_distill::dom;
/// use web_distill::normalize::markdown::render;
///
/// let doc = dom::parse("<h2>Intro</h2><p>Hello <b>world</b></p><ul><li>a</li><li>b</li></ul>");
/// assert_eq!(render(&doc.select("body")), "## Intro\n\nHello **world**\n\n- a\n- b");
/// ```
#[must_use]
pub fn render(root: &Selection) -> String {
    let Some(node) = root.nodes().first() else {
        return String::new();
    };
    let mut renderer = Renderer::default();
    renderer.walk(node, 0);
    renderer.finish("\n\n")
}

#[derive(Default)]
struct Renderer {
    blocks: Vec<String>,
    inline: String,
}

impl Renderer {
    fn finish(mut self, separator: &str) -> String {
        self.flush();
        self.blocks.join(separator)
    }

    /// Close the running paragraph.
    fn flush(&mut self) {
        let paragraph = clean_paragraph(&self.inline);
        self.inline.clear();
        if !paragraph.is_empty() {
            self.blocks.push(paragraph);
        }
    }

    fn push_block(&mut self, block: String) {
        self.flush();
        if !block.trim().is_empty() {
            self.blocks.push(block);
        }
    }

    fn walk(&mut self, node: &NodeRef, depth: usize) {
        for child in node.children() {
            if child.is_text() {
                push_text(&mut self.inline, &child.text());
            } else if child.is_element() {
                if depth >= MAX_RENDER_DEPTH {
                    push_text(&mut self.inline, &child.text());
                    continue;
                }
                let tag = dom::node_tag(&child).unwrap_or_default();
                self.element(&child, &tag, depth + 1);
            }
        }
    }

    fn element(&mut self, node: &NodeRef, tag: &str, depth: usize) {
        if let Some(level) = dom::heading_level(tag) {
            let mut text = String::new();
            inline_children(&mut text, node, depth);
            let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
            if !text.is_empty() {
                self.push_block(format!("{} {text}", "#".repeat(level)));
            }
            return;
        }

        match tag {
            "p" => {
                self.flush();
                inline_children(&mut self.inline, node, depth);
                self.flush();
            }
            "pre" => self.push_block(fence_code(&node.text())),
            "blockquote" => {
                let mut inner = Renderer::default();
                inner.walk(node, depth);
                let quoted = inner
                    .finish("\n\n")
                    .lines()
                    .map(|line| if line.is_empty() { ">".to_string() } else { format!("> {line}") })
                    .collect::<Vec<_>>()
                    .join("\n");
                self.push_block(quoted);
            }
            "ul" | "ol" => {
                let list = render_list(node, tag == "ol", depth);
                self.push_block(list);
            }
            "table" => {
                let table = Selection::from(*node);
                if is_layout_table(&table) {
                    self.flush();
                    self.walk(node, depth);
                    self.flush();
                } else {
                    self.push_block(table_to_markdown(&table));
                }
            }
            "hr" => self.push_block("---".to_string()),
            "br" => self.inline.push('\n'),
            _ if dom::is_block_tag(tag) => {
                self.flush();
                self.walk(node, depth);
                self.flush();
            }
            _ => inline_element(&mut self.inline, node, tag, depth),
        }
    }
}

fn render_list(node: &NodeRef, ordered: bool, depth: usize) -> String {
    let mut number = Selection::from(*node)
        .attr("start")
        .and_then(|start| start.trim().parse::<usize>().ok())
        .unwrap_or(1);
    let mut lines = Vec::new();

    for item in dom::element_children(node) {
        let mut inner = Renderer::default();
        inner.walk(&item, depth + 1);
        let body = inner.finish("\n");
        if body.is_empty() {
            continue;
        }

        let marker = if ordered { format!("{number}.") } else { "-".to_string() };
        number += 1;
        let indent = " ".repeat(marker.len() + 1);
        for (i, line) in body.lines().enumerate() {
            if i == 0 {
                lines.push(format!("{marker} {line}"));
            } else if line.is_empty() {
                lines.push(String::new());
            } else {
                lines.push(format!("{indent}{line}"));
            }
        }
    }

    lines.join("\n")
}

fn inline_children(out: &mut String, node: &NodeRef, depth: usize) {
    for child in node.children() {
        if child.is_text() {
            push_text(out, &child.text());
        } else if child.is_element() {
            if depth >= MAX_RENDER_DEPTH {
                push_text(out, &child.text());
                continue;
            }
            let tag = dom::node_tag(&child).unwrap_or_default();
            inline_element(out, &child, &tag, depth + 1);
        }
    }
}

fn inline_element(out: &mut String, node: &NodeRef, tag: &str, depth: usize) {
    match tag {
        "strong" | "b" => wrap_emphasis(out, node, "**", depth),
        "em" | "i" => wrap_emphasis(out, node, "*", depth),
        "code" | "kbd" | "samp" | "tt" => {
            let code = node.text();
            let code = code.split_whitespace().collect::<Vec<_>>().join(" ");
            if !code.is_empty() {
                out.push_str(&inline_code(&code));
            }
        }
        "br" => out.push('\n'),
        _ => inline_children(out, node, depth),
    }
}

fn wrap_emphasis(out: &mut String, node: &NodeRef, marker: &str, depth: usize) {
    let mut inner = String::new();
    inline_children(&mut inner, node, depth);
    let trimmed = inner.trim();
    if trimmed.is_empty() {
        if !inner.is_empty() {
            push_space(out);
        }
        return;
    }
    if inner.starts_with(char::is_whitespace) {
        push_space(out);
    }
    out.push_str(marker);
    out.push_str(trimmed);
    out.push_str(marker);
    if inner.ends_with(char::is_whitespace) {
        out.push(' ');
    }
}

/// Append `text` collapsed and escaped, keeping one space at its edges.
fn push_text(out: &mut String, text: &str) {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() {
        if !text.is_empty() {
            push_space(out);
        }
        return;
    }
    if text.starts_with(char::is_whitespace) {
        push_space(out);
    }
    out.push_str(&escape_markdown(&words.join(" ")));
    if text.ends_with(char::is_whitespace) {
        push_space(out);
    }
}

fn push_space(out: &mut String) {
    if !out.is_empty() && !out.ends_with(' ') && !out.ends_with('\n') {
        out.push(' ');
    }
}

/// Trim each line of a paragraph and escape block-starting characters.
fn clean_paragraph(inline: &str) -> String {
    inline
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(escape_line_start)
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(html: &str) -> String {
        let doc = dom::parse(html);
        render(&doc.select("body"))
    }

    #[test]
    fn single_paragraph() {
        assert_eq!(md("<p>Hello world</p>"), "Hello world");
    }

    #[test]
    fn headings_are_atx() {
        assert_eq!(md("<h1>Title</h1><h3>Sub  section</h3>"), "# Title\n\n### Sub section");
    }

    #[test]
    fn paragraphs_separated_by_blank_line() {
        assert_eq!(md("<p>One.</p>\n  <p>Two.</p>"), "One.\n\nTwo.");
    }

    #[test]
    fn br_is_line_break() {
        assert_eq!(md("<p>Line 1<br>Line 2</p>"), "Line 1\nLine 2");
    }

    #[test]
    fn inline_emphasis_and_code() {
        assert_eq!(
            md("<p>This is <strong>bold</strong>, <em> italic </em>and <code>x_y</code>.</p>"),
            "This is **bold**, *italic* and `x_y`."
        );
    }

    #[test]
    fn text_is_escaped() {
        assert_eq!(md("<p>*not emphasis* but 2 * 3 = my_var</p>"), r"\*not emphasis\* but 2 * 3 = my_var");
        assert_eq!(md("<p># not a heading</p>"), r"\# not a heading");
        assert_eq!(md("<p>&gt; not a quote</p>"), r"\> not a quote");
    }

    #[test]
    fn nested_lists_indent() {
        assert_eq!(
            md("<ol><li>First<ul><li>inner</li></ul></li><li>Second</li></ol>"),
            "1. First\n   - inner\n2. Second"
        );
    }

    #[test]
    fn ordered_list_respects_start() {
        assert_eq!(md(r#"<ol start="4"><li>d</li><li>e</li></ol>"#), "4. d\n5. e");
    }

    #[test]
    fn blockquote_prefixes_lines() {
        assert_eq!(
            md("<blockquote><p>Quoted one.</p><p>Quoted two.</p></blockquote>"),
            "> Quoted one.\n>\n> Quoted two."
        );
    }

    #[test]
    fn pre_is_fenced_verbatim() {
        assert_eq!(
            md("<pre>fn main() {\n    println!(\"*hi*\");\n}</pre>"),
            "```\nfn main() {\n    println!(\"*hi*\");\n}\n```"
        );
    }

    #[test]
    fn container_text_becomes_paragraph() {
        assert_eq!(md("<div>Loose text<div>Inner block</div>tail</div>"), "Loose text\n\nInner block\n\ntail");
    }

    #[test]
    fn data_table_is_gfm() {
        let out = md("<p>Before</p><table><tr><th>A</th></tr><tr><td>1</td></tr></table>");
        assert_eq!(out, "Before\n\n| A   |\n| --- |\n| 1   |");
    }

    #[test]
    fn empty_elements_produce_nothing() {
        assert_eq!(md("<p> </p><div><b></b></div>"), "");
    }
}
