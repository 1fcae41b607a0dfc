//! Normalization of isolated content into markdown or plain text.

pub mod markdown;
pub mod text;

use crate::dom;
use crate::error::{Error, Result};
use crate::isolate::{ContentBody, IsolatedContent};
use crate::request::OutputFormat;
use crate::result::NormalizedText;

/// Convert isolated content to the requested representation.
///
/// `original_length` on the result counts the characters of the isolated
/// content's plain text.
///
/// # Errors
///
/// Returns [`Error::NoContentFound`] when the conversion yields no text.
///
/// # Examples
///
/// ```
/// use web_distill::isolate::isolate_html;
/// use web_distill::normalize::normalize;
/// use web_distill::{Options, OutputFormat};
///
/// let content = isolate_html("<article><h1>T</h1><p>Hello</p></article>", &Options::default()).unwrap();
/// let markdown = normalize(&content, OutputFormat::Markdown).unwrap();
/// assert_eq!(markdown.as_str(), "# T\n\nHello");
/// let text = normalize(&content, OutputFormat::Text).unwrap();
/// assert_eq!(text.as_str(), "T Hello");
/// ```
pub fn normalize(content: &IsolatedContent, format: OutputFormat) -> Result<NormalizedText> {
    let (rendered, original_length) = match content.body() {
        ContentBody::Tree(doc) => {
            let body = doc.select("body");
            let plain = text::flatten(&body);
            let original_length = plain.chars().count();
            let rendered = match format {
                OutputFormat::Markdown => markdown::render(&body),
                OutputFormat::Text => plain,
            };
            (rendered, original_length)
        }
        ContentBody::Markdown(source) => {
            let original_length = dom::collapsed_len(source);
            let rendered = match format {
                OutputFormat::Markdown => source.clone(),
                OutputFormat::Text => text::flatten_markdown(source),
            };
            (rendered, original_length)
        }
    };

    if rendered.is_empty() {
        return Err(Error::NoContentFound);
    }
    Ok(NormalizedText::new(rendered, original_length))
}
