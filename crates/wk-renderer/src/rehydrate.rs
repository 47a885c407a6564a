//! Internal link rehydration.
//!
//! Runs after block segmentation and swaps every placeholder for an anchor:
//!
//! ```html
//! <a class="internal-link" href="?page=Meeting%20Notes" data-page="Meeting Notes">Notes</a>
//! ```
//!
//! The `internal-link` class is styled non-bold, so a link inside a
//! `&bold(){...}` body still renders at normal weight.

use std::fmt::Write;

use crate::RenderError;
use crate::link::{Link, find_placeholder};
use crate::util::{encode_page, escape_html};

/// Class attribute shared by all internal anchors.
pub const INTERNAL_LINK_CLASS: &str = "internal-link";
/// Attribute carrying the raw target page name.
pub const PAGE_ATTRIBUTE: &str = "data-page";
/// Default prefix of an internal link `href`.
pub const DEFAULT_LINK_BASE: &str = "?page=";

/// Render the anchor for an internal link.
#[must_use]
pub fn internal_anchor(link: &Link, link_base: &str) -> String {
    let mut out = String::new();
    write_anchor(&mut out, link, link_base);
    out
}

fn write_anchor(out: &mut String, link: &Link, link_base: &str) {
    write!(
        out,
        r#"<a class="{INTERNAL_LINK_CLASS}" href="{}{}" {PAGE_ATTRIBUTE}="{}">{}</a>"#,
        escape_html(link_base),
        encode_page(&link.target),
        escape_html(&link.target),
        link.label
    )
    .unwrap();
}

/// Replace every placeholder in `html` with the anchor for its link.
///
/// The fragment is scanned once, left to right.
///
/// # Errors
///
/// Returns [`RenderError::MalformedPlaceholder`] if a placeholder is garbled
/// or its index has no entry in `links`.
pub fn rehydrate(html: &str, links: &[Link], link_base: &str) -> Result<String, RenderError> {
    let mut out = String::with_capacity(html.len() + links.len() * 96);
    let mut rest = html;
    while let Some(token) = find_placeholder(rest) {
        let link = token
            .index
            .and_then(|index| links.get(index))
            .ok_or(RenderError::MalformedPlaceholder { index: token.index })?;
        out.push_str(&rest[..token.start]);
        write_anchor(&mut out, link, link_base);
        rest = &rest[token.end..];
    }
    out.push_str(rest);
    Ok(out)
}
