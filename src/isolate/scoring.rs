//! Readability-style candidate scoring.
//!
//! Paragraph-like blocks with enough text award points to up to five
//! ancestors. Each ancestor starts from a base score derived from its tag and
//! class/id names; the final score is discounted by its link density. The
//! best eligible candidate, plus qualifying siblings, forms the region.

use std::collections::HashMap;

use dom_query::{Document, NodeRef, Selection};

use crate::dom;
use crate::link_density::link_density;
use crate::options::{IsolationStrategy, Options};
use crate::patterns::{NEGATIVE_CLASS, POSITIVE_CLASS};

/// Ancestors credited by each paragraph.
const MAX_ANCESTOR_LEVELS: usize = 5;

/// Score credited by class/id names.
const CLASS_WEIGHT: f64 = 25.0;

/// Extra base score for `<article>`/`<main>` under the heuristic strategy.
const LANDMARK_BONUS: f64 = 25.0;

/// Sibling threshold never drops below this.
const MIN_SIBLING_THRESHOLD: f64 = 10.0;

/// Elements only valid inside a `<table>`; re-parsed on their own, the
/// parser drops their tags and neighbouring cells run together.
const TABLE_PARTS: &[&str] = &["caption", "colgroup", "col", "thead", "tbody", "tfoot", "tr", "td", "th"];

/// A scored element.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    /// Position in document order among scored-tree elements.
    pub index: usize,
    /// Lowercase tag name.
    pub tag: String,
    /// Score after the link-density discount.
    pub score: f64,
    /// Share of the text inside links.
    pub link_density: f64,
}

struct Entry<'a> {
    node: NodeRef<'a>,
    tag: String,
    parent: Option<usize>,
    score: f64,
    initialized: bool,
}

/// Score `doc` and return eligible candidates, best first.
///
/// Ties keep document order.
#[must_use]
pub fn rank_candidates(doc: &Document, options: &Options) -> Vec<Candidate> {
    let body = doc.select("body");
    let Some(body_node) = body.nodes().first().copied() else {
        return Vec::new();
    };
    let entries = score_tree(body_node, options);
    rank(&entries, options)
}

/// HTML of the best-scoring region, or `None` when nothing qualifies.
#[must_use]
pub fn select_region(doc: &Document, options: &Options) -> Option<String> {
    let body = doc.select("body");
    let body_node = body.nodes().first().copied()?;
    let entries = score_tree(body_node, options);
    let ranked = rank(&entries, options);
    let top = ranked.first()?;
    let top_entry = &entries[top.index];

    if let Some(table) = enclosing_table(top_entry.node) {
        return Some(Selection::from(table).html().to_string());
    }

    let Some(parent) = top_entry.parent else {
        return Some(Selection::from(top_entry.node).inner_html().to_string());
    };

    let threshold = (top.score * options.sibling_score_ratio).max(MIN_SIBLING_THRESHOLD);
    let scores: HashMap<usize, f64> = ranked.iter().map(|c| (c.index, c.score)).collect();

    let mut html = String::new();
    for (index, entry) in entries.iter().enumerate() {
        if entry.parent != Some(parent) {
            continue;
        }
        let keep = index == top.index
            || scores.get(&index).is_some_and(|score| *score >= threshold)
            || (entry.tag == "p" && is_prose_sibling(entry.node));
        if keep {
            html.push_str(&Selection::from(entry.node).html());
        }
    }
    Some(html)
}

/// The `<table>` owning a table-internal element.
fn enclosing_table(node: NodeRef<'_>) -> Option<NodeRef<'_>> {
    let mut current = node;
    loop {
        let tag = dom::node_tag(&current)?;
        if tag == "table" {
            return (current.id != node.id).then_some(current);
        }
        if !TABLE_PARTS.contains(&tag.as_str()) {
            return None;
        }
        current = current.parent()?;
    }
}

/// Flatten the element tree under `body` into document order.
///
/// Elements deeper than `max_tree_depth` are left out.
fn score_tree<'a>(body: NodeRef<'a>, options: &Options) -> Vec<Entry<'a>> {
    let mut entries: Vec<Entry<'a>> = Vec::new();
    let mut stack = vec![(body, None, 0usize)];

    while let Some((node, parent, depth)) = stack.pop() {
        let index = entries.len();
        entries.push(Entry {
            node,
            tag: dom::node_tag(&node).unwrap_or_default(),
            parent,
            score: 0.0,
            initialized: false,
        });
        if depth >= options.max_tree_depth {
            continue;
        }
        for child in dom::element_children(&node).into_iter().rev() {
            stack.push((child, Some(index), depth + 1));
        }
    }

    for index in 0..entries.len() {
        if !is_paragraph_like(&entries[index]) {
            continue;
        }
        let text = entries[index].node.text();
        let length = dom::collapsed_len(&text);
        if length < options.min_paragraph_chars {
            continue;
        }
        let points = paragraph_points(&text, length);

        let mut ancestor = entries[index].parent;
        let mut level = 0usize;
        while let Some(a) = ancestor {
            if level >= MAX_ANCESTOR_LEVELS {
                break;
            }
            if !entries[a].initialized {
                entries[a].score = base_score(&entries[a], options.strategy);
                entries[a].initialized = true;
            }
            entries[a].score += points / level_divider(level);
            ancestor = entries[a].parent;
            level += 1;
        }
    }

    entries
}

fn rank(entries: &[Entry], options: &Options) -> Vec<Candidate> {
    let mut candidates: Vec<Candidate> = entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| entry.initialized)
        .map(|(index, entry)| {
            let density = link_density(&Selection::from(entry.node));
            Candidate {
                index,
                tag: entry.tag.clone(),
                score: entry.score * (1.0 - density),
                link_density: density,
            }
        })
        .filter(|candidate| candidate.link_density <= options.max_link_density)
        .collect();

    candidates.sort_by(|a, b| b.score.total_cmp(&a.score).then(a.index.cmp(&b.index)));
    candidates
}

fn is_paragraph_like(entry: &Entry) -> bool {
    match entry.tag.as_str() {
        "p" | "pre" | "td" | "blockquote" => true,
        "div" | "section" => !dom::has_block_children(&entry.node),
        _ => false,
    }
}

/// One point, plus one per comma, plus one per 100 characters (at most 3).
#[allow(clippy::cast_precision_loss)]
fn paragraph_points(text: &str, length: usize) -> f64 {
    let commas = text.chars().filter(|c| matches!(c, ',' | '，' | '、')).count();
    1.0 + commas as f64 + (length / 100).min(3) as f64
}

#[allow(clippy::cast_precision_loss)]
fn level_divider(level: usize) -> f64 {
    match level {
        0 => 1.0,
        1 => 2.0,
        _ => level as f64 * 3.0,
    }
}

fn base_score(entry: &Entry, strategy: IsolationStrategy) -> f64 {
    let tag_score = match entry.tag.as_str() {
        "div" => 5.0,
        "pre" | "td" | "blockquote" => 3.0,
        "article" | "main" if strategy == IsolationStrategy::Heuristic => 10.0 + LANDMARK_BONUS,
        "article" | "main" => 10.0,
        "section" => 3.0,
        "address" | "ol" | "ul" | "dl" | "dd" | "dt" | "li" | "form" => -3.0,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "th" => -5.0,
        _ => 0.0,
    };
    tag_score + class_weight(&Selection::from(entry.node))
}

/// ±25 for each of class and id matching content or chrome names.
#[must_use]
pub fn class_weight(sel: &Selection) -> f64 {
    let mut weight = 0.0;
    for name in [dom::class_name(sel), dom::id(sel)].into_iter().flatten() {
        if NEGATIVE_CLASS.is_match(&name) {
            weight -= CLASS_WEIGHT;
        }
        if POSITIVE_CLASS.is_match(&name) {
            weight += CLASS_WEIGHT;
        }
    }
    weight
}

/// Unscored `<p>` siblings still join the region when they read as prose.
fn is_prose_sibling(node: NodeRef) -> bool {
    let sel = Selection::from(node);
    let text = sel.text();
    let length = dom::collapsed_len(&text);
    let density = link_density(&sel);
    if length > 80 {
        density < 0.25
    } else {
        length > 0 && density < f64::EPSILON && text.trim_end().ends_with('.')
    }
}
