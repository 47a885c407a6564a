//! Link data model and the placeholder grammar shielding internal links.
//!
//! A placeholder is `STX <decimal index> ETX`. Both delimiters are control
//! characters that [`sanitize`] strips from raw page text before any
//! placeholder is allocated, so a placeholder can never collide with
//! user-supplied text.

use std::borrow::Cow;

/// Opens a placeholder token.
pub(crate) const PLACEHOLDER_START: char = '\u{2}';
/// Closes a placeholder token.
pub(crate) const PLACEHOLDER_END: char = '\u{3}';

/// Replaces delimiter characters found in raw text.
const REPLACEMENT: char = char::REPLACEMENT_CHARACTER;

/// Kind of a bracket link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// Absolute `http://` or `https://` URL, rendered immediately.
    External,
    /// Another page of this wiki, resolved against the page store.
    Internal,
}

/// A link found in raw page text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// External or internal.
    pub kind: LinkKind,
    /// Visible anchor text.
    pub label: String,
    /// Absolute URL for external links, page name for internal ones.
    pub target: String,
}

impl Link {
    /// Create an external link.
    #[must_use]
    pub fn external(label: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            kind: LinkKind::External,
            label: label.into(),
            target: url.into(),
        }
    }

    /// Create an internal link.
    #[must_use]
    pub fn internal(label: impl Into<String>, page: impl Into<String>) -> Self {
        Self {
            kind: LinkKind::Internal,
            label: label.into(),
            target: page.into(),
        }
    }

    /// Whether this link addresses another page of the wiki.
    #[must_use]
    pub fn is_internal(&self) -> bool {
        self.kind == LinkKind::Internal
    }
}

/// Placeholder token for the internal link at `index`.
pub(crate) fn placeholder(index: usize) -> String {
    format!("{PLACEHOLDER_START}{index}{PLACEHOLDER_END}")
}

/// A placeholder token located in a fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PlaceholderToken {
    /// Byte offset of the opening delimiter.
    pub start: usize,
    /// Byte offset just past the closing delimiter.
    pub end: usize,
    /// Link index, `None` if the token is not `STX digits ETX`.
    pub index: Option<usize>,
}

/// Locate the first placeholder-like token in `text`.
pub(crate) fn find_placeholder(text: &str) -> Option<PlaceholderToken> {
    let start = text.find(PLACEHOLDER_START)?;
    let body_start = start + PLACEHOLDER_START.len_utf8();
    let body = &text[body_start..];
    let token = body.find(PLACEHOLDER_END).and_then(|len| {
        let digits = &body[..len];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let index = digits.parse().ok()?;
        Some(PlaceholderToken {
            start,
            end: body_start + len + PLACEHOLDER_END.len_utf8(),
            index: Some(index),
        })
    });
    Some(token.unwrap_or(PlaceholderToken {
        start,
        end: body_start,
        index: None,
    }))
}

/// Remove placeholder delimiters from raw page text.
pub(crate) fn sanitize(text: &str) -> Cow<'_, str> {
    if text.contains([PLACEHOLDER_START, PLACEHOLDER_END]) {
        let replacement = REPLACEMENT.to_string();
        Cow::Owned(text.replace([PLACEHOLDER_START, PLACEHOLDER_END], &replacement))
    } else {
        Cow::Borrowed(text)
    }
}
