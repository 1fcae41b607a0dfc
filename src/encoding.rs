//! Character encoding resolution and decoding.
//!
//! Web pages declare their charset in up to three places. They are consulted
//! in this order: byte-order mark, the `Content-Type` header, then a
//! `<meta>` declaration near the top of the document. UTF-8 is the fallback.

use encoding_rs::{Encoding, UTF_8};
use regex::Regex;
use std::sync::LazyLock;

/// Bytes of the document head scanned for a `<meta>` charset.
const META_SNIFF_BYTES: usize = 1024;

/// `<meta charset="...">`
#[allow(clippy::expect_used)]
static CHARSET_META_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>/;]+)"#).expect("valid regex")
});

/// `<meta http-equiv="Content-Type" content="...; charset=...">`
#[allow(clippy::expect_used)]
static HTTP_EQUIV_CHARSET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#).expect("valid regex")
});

/// Charset label declared by a `<meta>` tag in the first kilobyte.
#[must_use]
pub fn sniff_meta_charset(body: &[u8]) -> Option<String> {
    let head = &body[..body.len().min(META_SNIFF_BYTES)];
    let head = String::from_utf8_lossy(head);

    [&*HTTP_EQUIV_CHARSET_RE, &*CHARSET_META_RE]
        .iter()
        .find_map(|re| re.captures(&head).and_then(|c| c.get(1)))
        .map(|m| m.as_str().to_string())
}

/// Pick the encoding for `body`.
///
/// Unknown labels are skipped rather than treated as errors.
#[must_use]
pub fn resolve_encoding(declared: Option<&str>, body: &[u8]) -> &'static Encoding {
    if let Some((encoding, _bom_len)) = Encoding::for_bom(body) {
        return encoding;
    }

    declared
        .and_then(|label| Encoding::for_label(label.trim().as_bytes()))
        .or_else(|| {
            sniff_meta_charset(body).and_then(|label| Encoding::for_label(label.as_bytes()))
        })
        .unwrap_or(UTF_8)
}

/// Decode `body` to UTF-8.
///
/// Invalid sequences become U+FFFD instead of failing; a BOM is stripped.
///
/// # Examples
///
/// ```
/// use web_distill::encoding::decode;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
/// assert!(decode(None, html).contains("Café"));
/// ```
#[must_use]
pub fn decode(declared: Option<&str>, body: &[u8]) -> String {
    let encoding = resolve_encoding(declared, body);
    let (decoded, _encoding_used, _had_errors) = encoding.decode(body);
    decoded.into_owned()
}
