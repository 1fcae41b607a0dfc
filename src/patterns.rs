//! Compiled regex patterns for noise detection, scoring and text cleanup.
//!
//! All patterns are compiled once at first use via `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Noise Markers (element removal)
// =============================================================================

/// Matches class/id names indicating navigation elements.
///
/// `nav` only matches as a whole token or at a token edge so layout
/// containers like `in-page-nav-container` survive.
pub static NAVIGATION_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(^nav$|^nav[-_]|[-_]nav$|navbar|navigation|top[-_]?nav|main[-_]?menu|site[-_]?nav|\bmenu\b|site[-_]?footer|site[-_]?header|page[-_]?footer|breadcrumbs?)",
    )
    .expect("NAVIGATION_CLASS regex")
});

/// Matches a single class token (or id) naming an advertisement slot.
pub static ADVERTISEMENT_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(ad|ads|adv|advert|advertisement|advertising|adsbygoogle|ad[-_]?(slot|unit|container|wrapper|banner|block|box|zone)|banner[-_]?ad|google[-_]?ads?|dfp[-_][\w-]*|sponsor|sponsored|promo|promoted)$",
    )
    .expect("ADVERTISEMENT_TOKEN regex")
});

/// Matches class/id names of sidebars, share bars, sign-up prompts and
/// recommendation widgets.
pub static SIDEBAR_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(\bsidebar\b|side[-_]bar|widget[-_]?area|related[-_]?(posts|articles|stories|content|links)|\bshare\b|share[-_]?(bar|buttons|links|tools)|social[-_]?(links|share|media|icons)|newsletter|subscribe|cookie|consent|gdpr|popup|modal|taboola|outbrain)",
    )
    .expect("SIDEBAR_CLASS regex")
});

/// Inline styles that hide an element.
pub static HIDDEN_STYLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(display\s*:\s*none|visibility\s*:\s*hidden)").expect("HIDDEN_STYLE regex")
});

// =============================================================================
// Scoring Weights
// =============================================================================

/// Class/id names likely to hold main content.
pub static POSITIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(article|body|content|entry|hentry|h-entry|main|page|post|text|blog|story)")
        .expect("POSITIVE_CLASS regex")
});

/// Class/id names unlikely to hold main content.
pub static NEGATIVE_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(-ad-|hidden|banner|combx|comment|com-|contact|foot|footer|footnote|gdpr|masthead|media|meta|outbrain|promo|related|scroll|share|shoutbox|sidebar|skyscraper|sponsor|shopping|tags|tool|widget)",
    )
    .expect("NEGATIVE_CLASS regex")
});

// =============================================================================
// Text Cleaning Patterns
// =============================================================================

/// Matches runs of whitespace for collapsing.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex"));

/// Matches three or more consecutive newlines (blank-line runs).
pub static MULTIPLE_NEWLINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("MULTIPLE_NEWLINES regex"));

/// Matches trailing spaces and tabs at line ends.
pub static TRAILING_LINE_WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)[ \t]+$").expect("TRAILING_LINE_WHITESPACE regex"));

// =============================================================================
// Markdown Sanitization Patterns
// =============================================================================

/// Markdown image: `![alt](src "title")` or `![alt][ref]`. Destinations may
/// hold one level of balanced parentheses.
pub static MD_IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"!\[[^\]]*\](?:\((?:[^()]|\([^()]*\))*\)|\[[^\]]*\])").expect("MD_IMAGE regex")
});

/// Markdown inline link: `[text](href)`; group 1 is the text. Handles
/// `wiki/Rust_(language)` style destinations.
pub static MD_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[([^\]]*)\]\((?:[^()]|\([^()]*\))*\)").expect("MD_LINK regex")
});

/// Markdown reference link: `[text][id]` or `[text][]`; group 1 is the text.
pub static MD_REFERENCE_LINK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\[[^\]]*\]").expect("MD_REFERENCE_LINK regex"));

/// Markdown reference definition line: `[id]: https://...`.
pub static MD_REFERENCE_DEF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*\[[^\]]+\]:[ \t]*\S+.*$").expect("MD_REFERENCE_DEF regex")
});

/// Raw `<img>` tags left inside markdown.
pub static HTML_IMG_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<img\b[^>]*>").expect("HTML_IMG_TAG regex"));

/// Markdown heading or blockquote markers at line start.
pub static MD_LINE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*(#{1,6}|>+)[ \t]*").expect("MD_LINE_MARKER regex"));

/// Backslash escapes (group 1 holds the literal) or emphasis and code
/// markers (`**`, `__`, `*`, `` ` ``, fences).
pub static MD_EMPHASIS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\\([\\`*_\[\]<>#+.|-])|\*{1,3}|_{2,3}|`+").expect("MD_EMPHASIS regex")
});

/// List item markers at line start.
pub static MD_LIST_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*([-+*]|\d+\.)[ \t]+").expect("MD_LIST_MARKER regex"));

/// Table separator rows and horizontal rules.
pub static MD_RULE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*\|?[ \t:|-]*-{3,}[ \t:|-]*$").expect("MD_RULE_LINE regex"));
