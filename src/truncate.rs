//! Boundary-safe truncation.
//!
//! Text over the limit is cut at the limit, then rolled back to the nearest
//! preceding whitespace if one lies within the rollback window
//! (`rollback_ratio` of the limit). Without such a boundary the hard cut
//! stands. Lengths are counted in `char`s, never bytes.

use crate::config::TruncateConfig;
use crate::request::LimitUnit;

/// Outcome of a truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Truncated {
    /// The possibly shortened text.
    pub text: String,
    /// Whether anything was cut.
    pub truncated: bool,
}

/// Characters per token, rounded up.
///
/// # Examples
///
/// ```
/// use web_distill::truncate::estimate_tokens;
///
/// assert_eq!(estimate_tokens("abcdefgh", 4), 2);
/// assert_eq!(estimate_tokens("abcdefghi", 4), 3);
/// assert_eq!(estimate_tokens("", 4), 0);
/// ```
#[must_use]
pub fn estimate_tokens(text: &str, chars_per_token: usize) -> usize {
    text.chars().count().div_ceil(chars_per_token.max(1))
}

/// Characters allowed by `limit` in `unit`.
#[must_use]
pub fn char_budget(limit: usize, unit: LimitUnit, config: &TruncateConfig) -> usize {
    match unit {
        LimitUnit::Characters => limit,
        LimitUnit::ApproxTokens => limit.saturating_mul(config.chars_per_token.max(1)),
    }
}

/// Fit `text` into `limit` units.
///
/// # Examples
///
/// ```
/// use web_distill::truncate::truncate;
/// use web_distill::{LimitUnit, TruncateConfig};
///
/// let text = "The quick brown fox jumps over the lazy dog";
/// let cut = truncate(text, 32, LimitUnit::Characters, &TruncateConfig::default());
/// assert_eq!(cut.text, "The quick brown fox jumps over");
/// assert!(cut.truncated);
/// ```
#[must_use]
pub fn truncate(text: &str, limit: usize, unit: LimitUnit, config: &TruncateConfig) -> Truncated {
    truncate_chars(text, char_budget(limit, unit, config), config.rollback_ratio)
}

/// Fit `text` into `max_chars` characters.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn truncate_chars(text: &str, max_chars: usize, rollback_ratio: f64) -> Truncated {
    let Some((cut, _)) = text.char_indices().nth(max_chars) else {
        return Truncated {
            text: text.to_string(),
            truncated: false,
        };
    };

    let head = &text[..cut];
    let window = (max_chars as f64 * rollback_ratio.clamp(0.0, 1.0)).floor() as usize;

    let at_boundary = text[cut..].starts_with(char::is_whitespace);
    let kept = if at_boundary {
        head
    } else {
        rollback(head, max_chars, window).unwrap_or(head)
    };

    Truncated {
        text: kept.trim_end().to_string(),
        truncated: true,
    }
}

/// Prefix of `head` ending just before its last whitespace run, if that run
/// starts within `window` characters of the end.
fn rollback(head: &str, head_chars: usize, window: usize) -> Option<&str> {
    let (index, _) = head
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace())?;
    let dropped = head_chars - head[..index].chars().count();
    (dropped <= window).then(|| head[..index].trim_end())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(text: &str, limit: usize) -> Truncated {
        truncate_chars(text, limit, 0.10)
    }

    #[test]
    fn short_text_is_untouched() {
        let out = chars("Hello world", 100);
        assert_eq!(out.text, "Hello world");
        assert!(!out.truncated);
    }

    #[test]
    fn exact_fit_is_untouched() {
        let out = chars("Hello", 5);
        assert_eq!(out.text, "Hello");
        assert!(!out.truncated);
    }

    #[test]
    fn cut_on_whitespace_needs_no_rollback() {
        let out = chars("Hello world", 5);
        assert_eq!(out.text, "Hello");
        assert!(out.truncated);
    }

    #[test]
    fn mid_word_cut_rolls_back() {
        let text = "alpha beta gamma delta epsilon zeta eta theta";
        let out = truncate_chars(text, 20, 0.25);
        assert_eq!(out.text, "alpha beta gamma");
        let out = chars(text, 20);
        assert_eq!(out.text, "alpha beta gamma del");
        assert!(out.truncated);
    }

    #[test]
    fn hard_cut_when_no_boundary_in_window() {
        let text = "a ".to_string() + &"x".repeat(200);
        let out = chars(&text, 100);
        assert_eq!(out.text.chars().count(), 100);
        assert!(out.truncated);
    }

    #[test]
    fn multibyte_text_is_cut_on_char_boundaries() {
        let text = "日本語のテキスト".repeat(10);
        let out = chars(&text, 7);
        assert_eq!(out.text, "日本語のテキス");
    }

    #[test]
    fn zero_limit_yields_empty() {
        let out = chars("text", 0);
        assert_eq!(out.text, "");
        assert!(out.truncated);
    }

    #[test]
    fn tokens_scale_the_budget() {
        let config = TruncateConfig::default();
        let text = "word ".repeat(100);
        let out = truncate(&text, 10, LimitUnit::ApproxTokens, &config);
        assert!(out.truncated);
        assert!(out.text.chars().count() <= 40);
        assert!(estimate_tokens(&out.text, config.chars_per_token) <= 10);
    }

    #[test]
    fn result_never_exceeds_limit() {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit. ".repeat(50);
        for limit in [1, 7, 33, 100, 999] {
            let out = chars(&text, limit);
            assert!(out.text.chars().count() <= limit, "limit {limit}");
            assert!(out.truncated);
        }
    }
}
