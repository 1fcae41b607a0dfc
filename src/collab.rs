//! Boundaries to external collaborators: search aggregation and query
//! suggestions.
//!
//! Neither is implemented here. Search is a trait for an external provider
//! plus a bounded consumer; suggestions are a parser for the JSONP payload a
//! suggestion service returns.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// Result count used when a search request does not name one.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Vertical to search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Web pages.
    #[default]
    Text,
    /// Images.
    Images,
    /// Videos.
    Videos,
}

/// One provider result, passed through untouched.
pub type SearchRecord = Map<String, Value>;

/// An external search provider.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Up to `limit` results for `query`.
    ///
    /// # Errors
    ///
    /// Provider-specific; typically [`Error::Transport`] or
    /// [`Error::UpstreamHttp`].
    async fn search(&self, query: &str, kind: SearchKind, limit: usize) -> Result<Vec<SearchRecord>>;
}

/// Take at most `limit` records (default [`DEFAULT_MAX_RESULTS`]) from a
/// possibly unbounded sequence.
///
/// Consumption stops after `limit` items; later items are never pulled.
///
/// # Examples
///
/// ```
/// use web_distill::collab::{take_results, DEFAULT_MAX_RESULTS};
///
/// assert_eq!(take_results(1.., Some(3)), vec![1, 2, 3]);
/// assert_eq!(take_results(1.., None).len(), DEFAULT_MAX_RESULTS);
/// ```
pub fn take_results<I: IntoIterator>(records: I, limit: Option<usize>) -> Vec<I::Item> {
    records
        .into_iter()
        .take(limit.unwrap_or(DEFAULT_MAX_RESULTS))
        .collect()
}

/// Parsed suggestion payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionSet {
    /// Query the suggestions are for.
    pub query: String,
    /// Provider-reported result count.
    pub full_results: i64,
    /// Suggestions in provider order.
    pub suggestions: Vec<Suggestion>,
}

/// A single query suggestion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Suggested query text.
    #[serde(rename(deserialize = "Txt"), default)]
    pub text: String,
    /// Suggestion type tag.
    #[serde(rename(deserialize = "Type"), default)]
    pub r#type: String,
    /// Provider ranking key, string or number depending on the provider.
    #[serde(rename(deserialize = "Sk"), default = "empty_score")]
    pub score: Value,
    /// Provider history flag.
    #[serde(rename(deserialize = "HCS"), default)]
    pub hcs: i64,
}

fn empty_score() -> Value {
    Value::String(String::new())
}

#[derive(Deserialize, Default)]
struct Envelope {
    #[serde(rename = "AS", default)]
    auto_suggest: AutoSuggest,
}

#[derive(Deserialize, Default)]
struct AutoSuggest {
    #[serde(rename = "Query", default)]
    query: String,
    #[serde(rename = "FullResults", default)]
    full_results: i64,
    #[serde(rename = "Results", default)]
    results: Vec<SuggestGroup>,
}

#[derive(Deserialize)]
struct SuggestGroup {
    #[serde(rename = "Suggests", default)]
    suggests: Vec<Suggestion>,
}

/// Parse a JSON-in-JSONP suggestion payload.
///
/// The JSON object is taken from the first `{` to the last `}`, so any
/// callback wrapper is ignored. Missing fields default to empty.
///
/// # Errors
///
/// Returns [`Error::MalformedInput`] if no object is present or it is not
/// valid JSON of the expected shape.
///
/// # Examples
///
/// ```
/// use web_distill::collab::parse_suggestions;
///
/// let payload = r#"callback({"AS":{"Query":"rust","FullResults":1,
///     "Results":[{"Suggests":[{"Txt":"rust lang","Type":"AS","Sk":"","HCS":0}]}]}});"#;
/// let set = parse_suggestions(payload).unwrap();
/// assert_eq!(set.query, "rust");
/// assert_eq!(set.suggestions[0].text, "rust lang");
/// ```
pub fn parse_suggestions(payload: &str) -> Result<SuggestionSet> {
    let (Some(start), Some(end)) = (payload.find('{'), payload.rfind('}')) else {
        return Err(Error::MalformedInput("suggestion payload holds no JSON object".into()));
    };
    if end < start {
        return Err(Error::MalformedInput("suggestion payload holds no JSON object".into()));
    }

    let envelope: Envelope = serde_json::from_str(&payload[start..=end])
        .map_err(|e| Error::MalformedInput(format!("suggestion payload: {e}")))?;
    let auto_suggest = envelope.auto_suggest;
    Ok(SuggestionSet {
        query: auto_suggest.query,
        full_results: auto_suggest.full_results,
        suggestions: auto_suggest
            .results
            .into_iter()
            .flat_map(|group| group.suggests)
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_suggestion_groups() {
        let payload = r#"/* cb */ callback({"AS":{"Query":"tokio","FullResults":2,"Results":[
            {"Type":"AS","Suggests":[{"Txt":"tokio runtime","Type":"AS","Sk":"","HCS":0}]},
            {"Type":"AS","Suggests":[{"Txt":"tokio select","Type":"AS","Sk":"SK1","HCS":1}]}
        ]}} /* end */);"#;
        let set = parse_suggestions(payload).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(set.query, "tokio");
        assert_eq!(set.full_results, 2);
        let texts: Vec<&str> = set.suggestions.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, ["tokio runtime", "tokio select"]);
        assert_eq!(set.suggestions[1].score, Value::String("SK1".into()));
        assert_eq!(set.suggestions[1].hcs, 1);
    }

    #[test]
    fn missing_fields_default() {
        let set = parse_suggestions("cb({})").unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(set, SuggestionSet::default());

        let set = parse_suggestions(r#"{"AS":{"Results":[{"Suggests":[{}]}]}}"#)
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(set.suggestions[0].text, "");
        assert_eq!(set.suggestions[0].score, Value::String(String::new()));
        assert_eq!(set.suggestions[0].hcs, 0);
    }

    #[test]
    fn rejects_payload_without_object() {
        assert!(matches!(parse_suggestions("callback()"), Err(Error::MalformedInput(_))));
        assert!(matches!(parse_suggestions("} nothing {"), Err(Error::MalformedInput(_))));
        assert!(matches!(parse_suggestions("cb({not json})"), Err(Error::MalformedInput(_))));
    }

    #[test]
    fn serializes_camel_case() {
        let set = SuggestionSet {
            query: "q".into(),
            full_results: 1,
            suggestions: vec![Suggestion {
                text: "q x".into(),
                r#type: "AS".into(),
                score: Value::String(String::new()),
                hcs: 0,
            }],
        };
        let json = serde_json::to_value(&set).unwrap_or_default();
        assert_eq!(json["fullResults"], 1);
        assert_eq!(json["suggestions"][0]["text"], "q x");
        assert_eq!(json["suggestions"][0]["type"], "AS");
    }

    #[test]
    fn take_results_stops_early() {
        let mut pulled = 0;
        let records = std::iter::repeat_with(|| {
            pulled += 1;
            SearchRecord::new()
        });
        assert_eq!(take_results(records, Some(4)).len(), 4);
        assert_eq!(pulled, 4);
        assert!(take_results(Vec::<SearchRecord>::new(), Some(10)).is_empty());
    }

    #[test]
    fn take_results_defaults_to_ten() {
        let records = std::iter::repeat_with(SearchRecord::new);
        assert_eq!(take_results(records, None).len(), DEFAULT_MAX_RESULTS);
    }

    struct FixedProvider;

    #[async_trait]
    impl SearchProvider for FixedProvider {
        async fn search(&self, query: &str, kind: SearchKind, limit: usize) -> Result<Vec<SearchRecord>> {
            let records = (0..).map(|i| {
                let mut record = SearchRecord::new();
                record.insert("title".into(), Value::String(format!("{query} {i}")));
                record.insert("kind".into(), serde_json::to_value(kind).unwrap_or_default());
                record
            });
            Ok(take_results(records, Some(limit)))
        }
    }

    #[tokio::test]
    async fn provider_respects_limit() {
        let records = FixedProvider
            .search("rust", SearchKind::Images, 3)
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(records.len(), 3);
        assert_eq!(records[2]["title"], "rust 2");
        assert_eq!(records[0]["kind"], "images");
    }
}
