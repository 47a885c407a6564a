//! Shared utility functions for wiki rendering.

use std::borrow::Cow;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};

/// Characters left unescaped in a query component (RFC 3986 unreserved plus
/// the sub-delimiters browsers keep in `encodeURIComponent`).
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Escape special HTML characters for use in attribute values.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Percent-encode a page name for use as a query parameter value.
///
/// # Examples
///
/// ```
/// use wk_renderer::encode_page;
///
/// assert_eq!(encode_page("Home"), "Home");
/// assert_eq!(encode_page("Meeting Notes"), "Meeting%20Notes");
/// ```
#[must_use]
pub fn encode_page(page: &str) -> String {
    utf8_percent_encode(page, QUERY_COMPONENT).to_string()
}

/// Decode a percent-encoded page name. Invalid UTF-8 is replaced lossily.
#[must_use]
pub fn decode_page(encoded: &str) -> Cow<'_, str> {
    percent_decode_str(encoded).decode_utf8_lossy()
}
