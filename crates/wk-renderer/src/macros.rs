//! Inline decoration macros.
//!
//! - `&bold(){text}` → `<strong>text</strong>`
//! - `&br()` → `<br>`
//!
//! Expansion is a single pass: a macro nested inside a bold body is left as
//! written. Bodies never span lines.

use std::sync::LazyLock;

use regex::Regex;

/// Markup emitted for `&br()`.
pub(crate) const LINE_BREAK: &str = "<br>";

static BOLD_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&bold\(\)\{(.+?)\}").unwrap());

static BR_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&br\(\)").unwrap());

/// Expand inline macros in placeholder-protected text.
#[must_use]
pub fn expand_macros(text: &str) -> String {
    let bold = BOLD_PATTERN.replace_all(text, "<strong>$1</strong>");
    BR_PATTERN.replace_all(&bold, LINE_BREAK).into_owned()
}
