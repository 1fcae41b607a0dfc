//! Pipeline coordinator.
//!
//! Each request moves linearly through
//! `Received → Fetching → Isolating → Normalizing → Truncating → Completed`;
//! any stage may divert to `Failed`, tagged with that stage. Stages run
//! strictly in sequence and nothing is retried.
//!
//! Only fetching awaits. The CPU-bound stages run synchronously in
//! [`Pipeline::process`], so parsed documents never cross an await point.

use std::fmt;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::PipelineConfig;
use crate::error::{Error, ExtractionFailure, Result, Stage};
use crate::fetch::{build_fetcher, Fetcher};
use crate::isolate::isolate;
use crate::normalize::normalize;
use crate::request::{FetchRequest, LimitUnit, OutputFormat};
use crate::result::{ExtractionResult, RawDocument};
use crate::truncate::truncate;

/// Lifecycle state of a single request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineState {
    /// Accepted, not yet validated.
    Received,
    /// Waiting on the network.
    Fetching,
    /// Locating the main content.
    Isolating,
    /// Rendering markdown or text.
    Normalizing,
    /// Enforcing the size limit.
    Truncating,
    /// Finished with a result.
    Completed,
    /// Finished with an error raised in the given stage.
    Failed(Stage),
}

impl PipelineState {
    /// State reached when the current stage succeeds.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Received => Some(Self::Fetching),
            Self::Fetching => Some(Self::Isolating),
            Self::Isolating => Some(Self::Normalizing),
            Self::Normalizing => Some(Self::Truncating),
            Self::Truncating => Some(Self::Completed),
            Self::Completed | Self::Failed(_) => None,
        }
    }

    /// Stage of a non-terminal state.
    #[must_use]
    pub const fn stage(self) -> Option<Stage> {
        match self {
            Self::Received => Some(Stage::Received),
            Self::Fetching => Some(Stage::Fetching),
            Self::Isolating => Some(Stage::Isolating),
            Self::Normalizing => Some(Stage::Normalizing),
            Self::Truncating => Some(Stage::Truncating),
            Self::Completed | Self::Failed(_) => None,
        }
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed(_))
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Completed => f.write_str("completed"),
            Self::Failed(stage) => write!(f, "failed({stage})"),
            other => match other.stage() {
                Some(stage) => f.write_str(stage.as_str()),
                None => Ok(()),
            },
        }
    }
}

/// Walks one request through its states, logging each transition.
struct Run<'a> {
    url: &'a str,
    state: PipelineState,
}

impl<'a> Run<'a> {
    fn new(url: &'a str) -> Self {
        debug!(url, state = %PipelineState::Received, "request received");
        Self {
            url,
            state: PipelineState::Received,
        }
    }

    /// Jump over the fetch when the document is already in hand.
    fn skip_fetch(&mut self) {
        debug!(url = self.url, from = %self.state, to = %PipelineState::Isolating, "fetch skipped");
        self.state = PipelineState::Isolating;
    }

    /// Advance to the next state after the current stage succeeded.
    fn advance(&mut self) {
        if let Some(next) = self.state.next() {
            debug!(url = self.url, from = %self.state, to = %next, "state transition");
            self.state = next;
        }
    }

    /// Fail the current stage.
    fn fail(&mut self, error: Error) -> ExtractionFailure {
        let stage = self.state.stage().unwrap_or(Stage::Received);
        warn!(url = self.url, %stage, kind = %error.kind(), error = %error, "extraction failed");
        self.state = PipelineState::Failed(stage);
        ExtractionFailure::new(stage, error)
    }
}

/// Request parameters with pipeline defaults applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Resolved {
    limit: usize,
    unit: LimitUnit,
    format: OutputFormat,
}

/// The extraction pipeline.
///
/// Cheap to clone; clones share the HTTP client and configuration.
#[derive(Clone)]
pub struct Pipeline {
    fetcher: Arc<dyn Fetcher>,
    config: Arc<PipelineConfig>,
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("fetcher", &self.fetcher.name())
            .field("config", &self.config)
            .finish()
    }
}

impl Pipeline {
    /// Build a pipeline whose fetcher follows `config.fetcher.mode`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on invalid configuration.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        let fetcher = build_fetcher(&config.fetcher)?;
        Ok(Self {
            fetcher,
            config: Arc::new(config),
        })
    }

    /// Build a pipeline around a custom fetcher.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on invalid configuration.
    pub fn with_fetcher(config: PipelineConfig, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            fetcher,
            config: Arc::new(config),
        })
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run a request to completion.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionFailure`] naming the stage that failed.
    pub async fn extract(
        &self,
        request: &FetchRequest,
    ) -> std::result::Result<ExtractionResult, ExtractionFailure> {
        self.run(request, None).await
    }

    /// Run a request, abandoning it when `token` is cancelled.
    ///
    /// Cancellation during the fetch yields `Failed(Fetching)` with
    /// [`Error::Cancelled`]; no later stage runs.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionFailure`] naming the stage that failed.
    pub async fn extract_with_cancel(
        &self,
        request: &FetchRequest,
        token: &CancellationToken,
    ) -> std::result::Result<ExtractionResult, ExtractionFailure> {
        self.run(request, Some(token)).await
    }

    async fn run(
        &self,
        request: &FetchRequest,
        cancel: Option<&CancellationToken>,
    ) -> std::result::Result<ExtractionResult, ExtractionFailure> {
        let mut run = Run::new(&request.url);
        let resolved = self.resolve(request).map_err(|e| run.fail(e))?;
        run.advance();

        let fetched = match cancel {
            Some(token) => {
                tokio::select! {
                    biased;
                    () = token.cancelled() => Err(Error::Cancelled),
                    fetched = self.fetcher.fetch(&request.url) => fetched,
                }
            }
            None => self.fetcher.fetch(&request.url).await,
        };
        let raw = fetched.map_err(|e| run.fail(e))?;
        if cancel.is_some_and(CancellationToken::is_cancelled) {
            return Err(run.fail(Error::Cancelled));
        }
        run.advance();

        let result = stages(&mut run, &raw, resolved, &self.config)?;
        info!(
            url = %request.url,
            chars = result.character_count,
            truncated = result.truncated,
            "extraction completed"
        );
        Ok(result)
    }

    /// Run the CPU-bound stages on an already fetched document.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionFailure`] naming the stage that failed.
    pub fn process(
        &self,
        raw: &RawDocument,
        request: &FetchRequest,
    ) -> std::result::Result<ExtractionResult, ExtractionFailure> {
        process_document(raw, request, &self.config)
    }

    fn resolve(&self, request: &FetchRequest) -> Result<Resolved> {
        resolve(request, &self.config)
    }
}

/// Extract from HTML already in hand, skipping the fetch.
///
/// # Errors
///
/// Returns an [`ExtractionFailure`] naming the stage that failed.
///
/// # Examples
///
/// ```
/// use web_distill::{extract_html, FetchRequest, PipelineConfig};
///
/// let html = "<html><body><article><p>Hello <a href='/w'>world</a></p></article></body></html>";
/// let result = extract_html(html, &FetchRequest::new("https://example.com"), &PipelineConfig::default()).unwrap();
/// assert_eq!(result.content, "Hello world");
/// assert_eq!(result.character_count, 11);
/// assert!(!result.truncated);
/// ```
pub fn extract_html(
    html: &str,
    request: &FetchRequest,
    config: &PipelineConfig,
) -> std::result::Result<ExtractionResult, ExtractionFailure> {
    let raw = RawDocument::from_html(request.url.clone(), html);
    process_document(&raw, request, config)
}

fn process_document(
    raw: &RawDocument,
    request: &FetchRequest,
    config: &PipelineConfig,
) -> std::result::Result<ExtractionResult, ExtractionFailure> {
    let mut run = Run::new(&request.url);
    let resolved = resolve(request, config).map_err(|e| run.fail(e))?;
    run.skip_fetch();
    stages(&mut run, raw, resolved, config)
}

fn resolve(request: &FetchRequest, config: &PipelineConfig) -> Result<Resolved> {
    let limit = request.limit.unwrap_or_else(|| config.effective_default_limit());
    if limit == 0 {
        return Err(Error::Config("limit must be greater than 0".into()));
    }
    Ok(Resolved {
        limit,
        unit: request.unit,
        format: request.format.unwrap_or(config.default_format),
    })
}

/// Isolating → Normalizing → Truncating → Completed.
fn stages(
    run: &mut Run<'_>,
    raw: &RawDocument,
    resolved: Resolved,
    config: &PipelineConfig,
) -> std::result::Result<ExtractionResult, ExtractionFailure> {
    let content = isolate(raw, &config.options).map_err(|e| run.fail(e))?;
    run.advance();

    let normalized = normalize(&content, resolved.format).map_err(|e| run.fail(e))?;
    debug!(
        original = normalized.original_length(),
        produced = normalized.produced_length(),
        "content normalized"
    );
    run.advance();

    let cut = truncate(normalized.as_str(), resolved.limit, resolved.unit, &config.truncate);
    run.advance();

    Ok(ExtractionResult {
        character_count: cut.text.chars().count(),
        content: cut.text,
        limit_applied: resolved.limit,
        truncated: cut.truncated,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::time::Duration;

    /// Serves a fixed page, or a fixed failure, after an optional delay.
    struct StubFetcher {
        html: Option<&'static str>,
        delay: Duration,
    }

    #[async_trait]
    impl Fetcher for StubFetcher {
        fn name(&self) -> &'static str {
            "stub"
        }

        async fn fetch(&self, url: &str) -> Result<RawDocument> {
            tokio::time::sleep(self.delay).await;
            match self.html {
                Some(html) => Ok(RawDocument::from_html(url, html)),
                None => Err(Error::UpstreamHttp { status: 404 }),
            }
        }
    }

    fn pipeline(html: Option<&'static str>, delay: Duration) -> Pipeline {
        Pipeline::with_fetcher(PipelineConfig::default(), Arc::new(StubFetcher { html, delay }))
            .unwrap_or_else(|e| panic!("{e}"))
    }

    const PAGE: &str = "<html><body><nav><a href='/'>Home</a></nav>\
        <article><h1>Title</h1><p>First paragraph of the story.</p></article>\
        <footer>Copyright</footer></body></html>";

    #[test]
    fn states_advance_linearly() {
        let mut state = PipelineState::Received;
        let mut seen = vec![state];
        while let Some(next) = state.next() {
            state = next;
            seen.push(state);
        }
        assert_eq!(
            seen,
            [
                PipelineState::Received,
                PipelineState::Fetching,
                PipelineState::Isolating,
                PipelineState::Normalizing,
                PipelineState::Truncating,
                PipelineState::Completed,
            ]
        );
        assert!(state.is_terminal());
        assert!(PipelineState::Failed(Stage::Isolating).is_terminal());
        assert_eq!(PipelineState::Failed(Stage::Fetching).next(), None);
    }

    #[test]
    fn state_display() {
        assert_eq!(PipelineState::Normalizing.to_string(), "normalizing");
        assert_eq!(PipelineState::Failed(Stage::Fetching).to_string(), "failed(fetching)");
    }

    #[tokio::test]
    async fn extracts_through_all_stages() {
        let request = FetchRequest::new("https://example.com/story");
        let result = pipeline(Some(PAGE), Duration::ZERO)
            .extract(&request)
            .await
            .unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(result.content, "# Title\n\nFirst paragraph of the story.");
        assert_eq!(result.limit_applied, crate::request::DEFAULT_SIZE_LIMIT);
        assert!(!result.truncated);
        assert!(!result.content.contains("Home"));
        assert!(!result.content.contains("Copyright"));
    }

    #[tokio::test]
    async fn fetch_failure_is_tagged_fetching() {
        let request = FetchRequest::new("https://example.com/missing");
        match pipeline(None, Duration::ZERO).extract(&request).await {
            Ok(result) => panic!("expected failure, got {result:?}"),
            Err(failure) => {
                assert_eq!(failure.stage, Stage::Fetching);
                assert!(matches!(failure.error, Error::UpstreamHttp { status: 404 }));
            }
        }
    }

    #[tokio::test]
    async fn zero_limit_is_rejected_before_fetch() {
        let request = FetchRequest::new("https://example.com").with_limit(0);
        match pipeline(None, Duration::ZERO).extract(&request).await {
            Ok(result) => panic!("expected failure, got {result:?}"),
            Err(failure) => {
                assert_eq!(failure.stage, Stage::Received);
                assert!(matches!(failure.error, Error::Config(_)));
            }
        }
    }

    #[tokio::test]
    async fn cancellation_during_fetch() {
        let token = CancellationToken::new();
        let pipeline = pipeline(Some(PAGE), Duration::from_secs(30));
        let request = FetchRequest::new("https://example.com");

        let cancel = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancel.cancel();
        });

        match pipeline.extract_with_cancel(&request, &token).await {
            Ok(result) => panic!("expected cancellation, got {result:?}"),
            Err(failure) => {
                assert_eq!(failure.stage, Stage::Fetching);
                assert!(matches!(failure.error, Error::Cancelled));
            }
        }
    }

    #[tokio::test]
    async fn already_cancelled_token_never_completes() {
        let token = CancellationToken::new();
        token.cancel();
        let request = FetchRequest::new("https://example.com");
        let outcome = pipeline(Some(PAGE), Duration::ZERO)
            .extract_with_cancel(&request, &token)
            .await;
        assert!(matches!(outcome, Err(ExtractionFailure { stage: Stage::Fetching, error: Error::Cancelled })));
    }

    #[test]
    fn empty_body_fails_isolating() {
        let request = FetchRequest::new("https://example.com");
        match extract_html("", &request, &PipelineConfig::default()) {
            Ok(result) => panic!("expected failure, got {result:?}"),
            Err(failure) => {
                assert_eq!(failure.stage, Stage::Isolating);
                assert!(matches!(failure.error, Error::NoContentFound));
            }
        }
    }

    #[test]
    fn text_format_and_token_limit() {
        let request = FetchRequest::new("https://example.com")
            .with_format(OutputFormat::Text)
            .with_limit(3)
            .with_unit(LimitUnit::ApproxTokens);
        let result = extract_html(PAGE, &request, &PipelineConfig::default())
            .unwrap_or_else(|e| panic!("{e}"));
        // 3 tokens at 4 chars each: "Title First paragraph" cut at 12, rolled back to 11.
        assert_eq!(result.content, "Title First");
        assert_eq!(result.limit_applied, 3);
        assert!(result.truncated);
    }

    #[test]
    fn process_is_deterministic() {
        let pipeline = pipeline(None, Duration::ZERO);
        let raw = RawDocument::from_html("https://example.com", PAGE);
        let request = FetchRequest::new("https://example.com");
        let first = pipeline.process(&raw, &request).unwrap_or_else(|e| panic!("{e}"));
        let second = pipeline.process(&raw, &request).unwrap_or_else(|e| panic!("{e}"));
        assert_eq!(first, second);
    }
}
