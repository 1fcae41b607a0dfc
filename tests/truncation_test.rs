use web_distill::truncate::{char_budget, estimate_tokens, truncate, truncate_chars};
use web_distill::{LimitUnit, TruncateConfig};

const PROSE: &str = "It was the best of times, it was the worst of times, it was the age of wisdom, \
it was the age of foolishness, it was the epoch of belief, it was the epoch of incredulity, \
it was the season of Light, it was the season of Darkness.";

#[test]
fn text_within_limit_is_returned_unchanged() {
    let config = TruncateConfig::default();
    let len = PROSE.chars().count();
    for limit in [len, len + 1, len * 10] {
        let out = truncate(PROSE, limit, LimitUnit::Characters, &config);
        assert_eq!(out.text, PROSE);
        assert!(!out.truncated);
    }
}

#[test]
fn truncated_text_never_exceeds_limit() {
    let config = TruncateConfig::default();
    for limit in 1..PROSE.chars().count() {
        let out = truncate(PROSE, limit, LimitUnit::Characters, &config);
        assert!(out.truncated, "limit {limit}");
        assert!(out.text.chars().count() <= limit, "limit {limit}: {:?}", out.text);
        assert!(PROSE.starts_with(&out.text), "limit {limit}: {:?}", out.text);
        assert_eq!(out.text, out.text.trim_end());
    }
}

#[test]
fn cut_ends_on_boundary_when_one_is_in_window() {
    let config = TruncateConfig::default();
    for limit in 20..PROSE.chars().count() {
        let out = truncate(PROSE, limit, LimitUnit::Characters, &config);
        let window = limit / 10;
        let head: String = PROSE.chars().take(limit).collect();
        let boundary_in_window = PROSE.chars().nth(limit).is_some_and(char::is_whitespace)
            || head
                .char_indices()
                .rev()
                .find(|(_, c)| c.is_whitespace())
                .is_some_and(|(i, _)| limit - head[..i].chars().count() <= window);

        let rest = &PROSE[out.text.len()..];
        let at_word_end = rest.starts_with(char::is_whitespace);
        if boundary_in_window {
            assert!(at_word_end, "limit {limit}: {:?}", out.text);
        } else {
            assert_eq!(out.text.chars().count(), limit, "limit {limit}");
        }
    }
}

#[test]
fn long_word_without_boundary_is_hard_cut() {
    let word = "x".repeat(500);
    let out = truncate_chars(&format!("intro {word}"), 100, 0.10);
    assert!(out.truncated);
    assert_eq!(out.text.chars().count(), 100);
    assert!(out.text.starts_with("intro x"));
}

#[test]
fn multibyte_text_is_counted_in_chars() {
    let text = "naïve café über straße déjà vu";
    let out = truncate_chars(text, 12, 0.25);
    assert_eq!(out.text, "naïve café");
    assert!(out.truncated);

    let cjk = "日本語のテキストを切り詰める";
    let out = truncate_chars(cjk, 5, 0.10);
    assert_eq!(out.text, "日本語のテ");
}

#[test]
fn token_limits_scale_by_chars_per_token() {
    let config = TruncateConfig::default();
    assert_eq!(char_budget(25, LimitUnit::ApproxTokens, &config), 100);
    assert_eq!(char_budget(25, LimitUnit::Characters, &config), 25);

    let by_tokens = truncate(PROSE, 25, LimitUnit::ApproxTokens, &config);
    let by_chars = truncate(PROSE, 100, LimitUnit::Characters, &config);
    assert_eq!(by_tokens, by_chars);
    assert!(estimate_tokens(&by_tokens.text, config.chars_per_token) <= 25);
}

#[test]
fn zero_window_keeps_hard_cut() {
    let out = truncate_chars("alpha beta gamma", 8, 0.0);
    assert_eq!(out.text, "alpha be");

    let out = truncate_chars("alpha beta gamma", 10, 0.0);
    assert_eq!(out.text, "alpha beta");
}
