//! Configuration options for content isolation.
//!
//! The `Options` struct controls how the main content region is located.
//! Noise removal is not configurable: it always runs.

use serde::Deserialize;

/// How the isolator locates the main content region.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationStrategy {
    /// Take an `<article>`/`<main>` landmark when the page has one, otherwise
    /// fall back to heuristic scoring.
    #[default]
    Structural,
    /// Always score block elements by text density, link density and tag
    /// semantics. Landmarks still receive a large bonus.
    Heuristic,
}

/// Configuration options for content isolation.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use web_distill::{IsolationStrategy, Options};
///
/// let options = Options {
///     strategy: IsolationStrategy::Heuristic,
///     ..Options::default()
/// };
/// assert_eq!(options.min_paragraph_chars, 25);
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Strategy used to locate the content region.
    ///
    /// Default: `Structural`
    pub strategy: IsolationStrategy,

    /// Minimum characters for a block to contribute to the scores of its
    /// ancestors.
    ///
    /// Default: `25`
    pub min_paragraph_chars: usize,

    /// Candidates whose link text exceeds this share of their text are not
    /// eligible as the content region.
    ///
    /// Default: `0.5`
    pub max_link_density: f64,

    /// Siblings of the winning candidate scoring at least this fraction of
    /// its score are kept alongside it.
    ///
    /// Default: `0.2`
    pub sibling_score_ratio: f64,

    /// Elements nested deeper than this are ignored by the scorer.
    ///
    /// Bounds the cost of scoring pathological documents.
    ///
    /// Default: `256`
    pub max_tree_depth: usize,

    /// Consult the `dom_smoothie` readability port when the scorer finds no
    /// candidate.
    ///
    /// Requires the `readability` feature flag.
    ///
    /// Default: `true`
    pub use_readability_fallback: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strategy: IsolationStrategy::Structural,
            min_paragraph_chars: 25,
            max_link_density: 0.5,
            sibling_score_ratio: 0.2,
            max_tree_depth: 256,
            use_readability_fallback: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_prefer_landmarks() {
        let options = Options::default();
        assert_eq!(options.strategy, IsolationStrategy::Structural);
        assert!((options.max_link_density - 0.5).abs() < f64::EPSILON);
        assert!(options.use_readability_fallback);
    }

    #[test]
    fn deserializes_partial_options() {
        let options: Options = serde_json::from_str(r#"{"strategy": "heuristic", "min_paragraph_chars": 40}"#)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(options.strategy, IsolationStrategy::Heuristic);
        assert_eq!(options.min_paragraph_chars, 40);
        assert_eq!(options.max_tree_depth, 256);
    }
}
