//! # web-distill
//!
//! Turns a web page into clean, size-bounded text for downstream consumers
//! such as language models.
//!
//! A request flows through four stages, run by the [`Pipeline`]:
//!
//! 1. **Fetch**: download the page, or ask an extraction proxy for
//!    pre-rendered markdown.
//! 2. **Isolate**: find the main content region and strip navigation,
//!    headers, footers, ads, media and link wrappers.
//! 3. **Normalize**: render the region as ATX markdown or plain text.
//! 4. **Truncate**: cut to the caller's limit (characters or approximate
//!    tokens) without splitting a word.
//!
//! Every failure is reported as an [`ExtractionFailure`] naming the stage
//! that produced it; a result is never silently partial.
//!
//! ## Quick Start
//!
//! ```rust
//! use web_distill::{extract_html, FetchRequest, PipelineConfig};
//!
//! let html = r#"<html><body><nav>Menu</nav>
//! <article><p>Hello <a href="x">world</a></p></article></body></html>"#;
//!
//! let request = FetchRequest::new("https://example.com").with_limit(1000);
//! let result = extract_html(html, &request, &PipelineConfig::default())?;
//! assert_eq!(result.content, "Hello world");
//! assert!(!result.truncated);
//! # Ok::<(), web_distill::ExtractionFailure>(())
//! ```
//!
//! Fetching over the network goes through [`Pipeline::extract`]:
//!
//! ```rust,no_run
//! use web_distill::{FetchRequest, Pipeline, PipelineConfig};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let pipeline = Pipeline::new(PipelineConfig::default())?;
//! let result = pipeline.extract(&FetchRequest::new("https://example.com/post")).await?;
//! println!("{}", result.content);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `readability` (default): fall back to `dom_smoothie` when neither a
//!   landmark nor the built-in scorer finds a content region.

mod config;
mod error;
mod options;
mod patterns;
mod request;
mod result;

/// DOM helpers over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Page retrieval: direct HTTP or extraction proxy.
pub mod fetch;

/// Main-content isolation and noise removal.
pub mod isolate;

/// Link density testing for boilerplate detection.
pub mod link_density;

/// Markdown primitives (escaping, code fences, tables).
pub mod markdown;

/// Rendering isolated content as markdown or plain text.
pub mod normalize;

/// Stage sequencing and failure tagging.
pub mod pipeline;

/// Boundary-safe truncation.
pub mod truncate;

/// Search and suggestion collaborator boundaries.
pub mod collab;

// Public API - re-exports
pub use config::{FetchMode, FetcherConfig, PipelineConfig, TruncateConfig, DEFAULT_USER_AGENT, JINA_READER_BASE};
pub use error::{Error, ErrorKind, ErrorResponse, ExtractionFailure, Result, Stage};
pub use fetch::Fetcher;
pub use options::{IsolationStrategy, Options};
pub use pipeline::{extract_html, Pipeline, PipelineState};
pub use request::{FetchRequest, LimitUnit, OutputFormat, DEFAULT_SIZE_LIMIT};
pub use result::{ExtractionResult, NormalizedText, PayloadKind, RawDocument};
