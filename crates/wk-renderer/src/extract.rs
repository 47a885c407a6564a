//! Bracket link extraction.
//!
//! Scans raw page text for `[[...]]` spans. Each span is matched against an
//! ordered list of rules and the first accepting rule wins:
//!
//! 1. `[[label>https://url]]` - labeled external link
//! 2. `[[https://url]]` - bare external link
//! 3. `[[label>page]]` or `[[page]]` - internal link
//!
//! External links are rendered to anchors immediately. Internal links are
//! replaced by placeholders and recorded in a side table, so macro expansion
//! and block segmentation never see their text.
//!
//! A span ends at the first `]]` on the same line. An opening `[[` without a
//! closing `]]` before the end of the line is left as literal text.

use std::fmt::Write;

use crate::link::{Link, placeholder, sanitize};
use crate::util::escape_html;

const OPEN: &str = "[[";
const CLOSE: &str = "]]";

/// Class attribute shared by all external anchors.
pub const EXTERNAL_LINK_CLASS: &str = "external-link";

/// Rule classifying the body of a `[[...]]` span.
type LinkRule = fn(&str) -> Option<Link>;

/// Link rules in precedence order. The internal rule accepts any body, so the
/// external rules must come first.
const LINK_RULES: [LinkRule; 3] = [labeled_external, bare_external, internal];

/// Result of link extraction.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Text with external links rendered and internal links replaced by
    /// placeholders.
    pub text: String,
    /// Internal links; the link at position `i` belongs to placeholder `i`.
    pub internal: Vec<Link>,
    /// External links in source order.
    pub external: Vec<Link>,
}

/// Extract bracket links from raw page text.
#[must_use]
pub fn extract_links(raw: &str) -> Extraction {
    let raw = sanitize(raw);
    let mut extraction = Extraction {
        text: String::with_capacity(raw.len()),
        ..Extraction::default()
    };

    let mut rest: &str = &raw;
    while let Some(open) = rest.find(OPEN) {
        extraction.text.push_str(&rest[..open]);
        let after = &rest[open + OPEN.len()..];

        let Some(close) = find_close(after) else {
            extraction.text.push_str(OPEN);
            rest = after;
            continue;
        };

        let body = &after[..close];
        // The internal rule accepts every body.
        if let Some(link) = LINK_RULES.iter().find_map(|rule| rule(body)) {
            extraction.push(link);
        }
        rest = &after[close + CLOSE.len()..];
    }
    extraction.text.push_str(rest);

    extraction
}

impl Extraction {
    fn push(&mut self, link: Link) {
        if link.is_internal() {
            self.text.push_str(&placeholder(self.internal.len()));
            self.internal.push(link);
        } else {
            write_external_anchor(&link, &mut self.text);
            self.external.push(link);
        }
    }
}

/// Position of the closing `]]` within the current line.
fn find_close(after: &str) -> Option<usize> {
    let line_end = after.find('\n').unwrap_or(after.len());
    after[..line_end].find(CLOSE)
}

/// Whether `s` is an absolute http(s) URL with a non-empty remainder.
fn is_url(s: &str) -> bool {
    s.strip_prefix("http://")
        .or_else(|| s.strip_prefix("https://"))
        .is_some_and(|rest| !rest.is_empty())
}

/// `label>https://url`: the label ends at the first `>` followed by a URL.
fn labeled_external(body: &str) -> Option<Link> {
    body.match_indices('>')
        .map(|(i, _)| (&body[..i], &body[i + 1..]))
        .find(|(_, url)| is_url(url))
        .map(|(label, url)| Link::external(label, url))
}

/// `https://url`: the URL doubles as the visible text.
fn bare_external(body: &str) -> Option<Link> {
    is_url(body).then(|| Link::external(body, body))
}

/// `label>page` or `page`.
#[allow(clippy::unnecessary_wraps)]
fn internal(body: &str) -> Option<Link> {
    Some(match body.split_once('>') {
        Some((label, page)) => Link::internal(label, page),
        None => Link::internal(body, body),
    })
}

/// Render an external anchor opening in a new browsing context.
fn write_external_anchor(link: &Link, out: &mut String) {
    write!(
        out,
        r#"<a class="{EXTERNAL_LINK_CLASS}" href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
        escape_html(&link.target),
        link.label
    )
    .unwrap();
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::link::find_placeholder;

    #[test]
    fn test_labeled_external_link() {
        let extraction = extract_links("[[Site>https://example.com]]");

        assert_eq!(
            extraction.text,
            r#"<a class="external-link" href="https://example.com" target="_blank" rel="noopener noreferrer">Site</a>"#
        );
        assert_eq!(
            extraction.external,
            vec![Link::external("Site", "https://example.com")]
        );
        assert!(extraction.internal.is_empty());
    }

    #[test]
    fn test_bare_external_link() {
        let extraction = extract_links("see [[http://example.com/a?b=1&c=2]] now");

        assert_eq!(
            extraction.text,
            r#"see <a class="external-link" href="http://example.com/a?b=1&amp;c=2" target="_blank" rel="noopener noreferrer">http://example.com/a?b=1&c=2</a> now"#
        );
    }

    #[test]
    fn test_external_runs_before_internal() {
        let extraction = extract_links("[[Docs>https://docs.rs]] [[Home]]");

        assert_eq!(extraction.external.len(), 1);
        assert_eq!(extraction.internal, vec![Link::internal("Home", "Home")]);
        assert!(extraction.text.contains(r#"href="https://docs.rs""#));
    }

    #[test]
    fn test_internal_links_get_sequential_placeholders() {
        let extraction = extract_links("[[Home]] and [[Go Home>Home]]");

        assert_eq!(
            extraction.internal,
            vec![
                Link::internal("Home", "Home"),
                Link::internal("Go Home", "Home")
            ]
        );
        assert_eq!(
            extraction.text,
            format!("{} and {}", placeholder(0), placeholder(1))
        );
    }

    #[test]
    fn test_label_splits_at_first_gt() {
        let extraction = extract_links("[[a>b>c]]");

        assert_eq!(extraction.internal, vec![Link::internal("a", "b>c")]);
    }

    #[test]
    fn test_labeled_external_label_may_contain_gt() {
        let extraction = extract_links("[[x>y>https://example.com]]");

        assert_eq!(
            extraction.external,
            vec![Link::external("x>y", "https://example.com")]
        );
    }

    #[test]
    fn test_scheme_without_host_is_internal() {
        let extraction = extract_links("[[http://]]");

        assert_eq!(extraction.internal, vec![Link::internal("http://", "http://")]);
    }

    #[test]
    fn test_non_greedy_up_to_first_close() {
        let extraction = extract_links("[[A]] x [[B]]");

        assert_eq!(
            extraction.internal,
            vec![Link::internal("A", "A"), Link::internal("B", "B")]
        );
    }

    #[test]
    fn test_empty_internal_link_is_kept() {
        let extraction = extract_links("[[]]");

        assert_eq!(extraction.internal, vec![Link::internal("", "")]);
        assert_eq!(extraction.text, placeholder(0));
    }

    #[test]
    fn test_unterminated_link_is_literal() {
        let extraction = extract_links("[[Home and more");

        assert_eq!(extraction.text, "[[Home and more");
        assert!(extraction.internal.is_empty());
    }

    #[test]
    fn test_link_does_not_span_lines() {
        let extraction = extract_links("[[Home\n]]");

        assert_eq!(extraction.text, "[[Home\n]]");
        assert!(extraction.internal.is_empty());
    }

    #[test]
    fn test_unterminated_then_valid_link() {
        let extraction = extract_links("[[open\n[[Home]]");

        assert_eq!(extraction.internal, vec![Link::internal("Home", "Home")]);
        assert_eq!(extraction.text, format!("[[open\n{}", placeholder(0)));
    }

    #[test]
    fn test_page_name_resembling_block_marker_is_hidden() {
        let extraction = extract_links("[[** Foo]]");

        assert!(!extraction.text.starts_with("**"));
        assert_eq!(find_placeholder(&extraction.text).unwrap().index, Some(0));
    }

    #[test]
    fn test_user_delimiters_cannot_forge_placeholders() {
        let extraction = extract_links("\u{2}0\u{3} [[Home]]");

        assert_eq!(extraction.internal.len(), 1);
        assert_eq!(extraction.text.matches('\u{2}').count(), 1);
    }

    #[test]
    fn test_rendered_output_does_not_rematch() {
        let first = extract_links("[[Site>https://example.com]]");
        let second = extract_links(&first.text);

        assert_eq!(second.text, first.text);
        assert!(second.external.is_empty());
        assert!(second.internal.is_empty());
    }
}
