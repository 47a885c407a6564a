//! Page views: the title block, rendered body and the missing-page view.

use std::fmt::Write;

use wk_renderer::{Link, escape_html};

/// Character repeated under a page title.
pub const TITLE_UNDERLINE: char = '━';
/// Notice shown in place of the body of a page that does not exist.
pub const MISSING_PAGE_NOTICE: &str = "This page does not exist yet.";

/// Styles the rendered markup relies on.
///
/// Internal links stay normal weight even inside bold text.
pub const STYLESHEET: &str = "\
.page-title h2 { margin-bottom: 0; }
.page-underline { overflow: hidden; white-space: nowrap; }
.internal-link { font-weight: normal; }
.internal-link.missing { color: #c0392b; text-decoration: underline dotted; }
.external-link::after { content: \" \\2197\"; }
.description { margin-left: 1.5em; }
.blank-line { margin: 0; }
";

/// Whether the viewer may draft pages that do not exist yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EditorAccess {
    /// Read-only view.
    #[default]
    Reader,
    /// Missing pages show a draft editor.
    Admin,
}

impl From<bool> for EditorAccess {
    fn from(admin: bool) -> Self {
        if admin { Self::Admin } else { Self::Reader }
    }
}

/// A page ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    /// Page name as requested.
    pub title: String,
    /// Title block followed by the body.
    pub html: String,
    /// Internal links of the body in source order.
    pub links: Vec<Link>,
    /// Linked pages that do not exist, sorted.
    pub missing_links: Vec<String>,
    /// The page store has no such page.
    pub missing: bool,
}

/// Render the heading shown above every page.
///
/// The underline is one [`TITLE_UNDERLINE`] per character of the title.
#[must_use]
pub fn title_block(title: &str) -> String {
    let underline: String =
        std::iter::repeat_n(TITLE_UNDERLINE, title.chars().count()).collect();
    format!(
        r#"<div class="page-title"><h2>{}</h2><div class="page-underline">{underline}</div></div>"#,
        escape_html(title)
    )
}

/// Render the view of a page that does not exist.
///
/// `draft_path` names the file that would hold the page; it is only shown
/// to admins, together with the draft editor.
#[must_use]
pub fn missing_page(title: &str, access: EditorAccess, draft_path: &str) -> String {
    let mut html = title_block(title);
    write!(html, "\n<p class=\"missing-page\">{MISSING_PAGE_NOTICE}</p>").unwrap();
    if access == EditorAccess::Admin {
        write!(
            html,
            "\n<textarea id=\"editor\" data-page=\"{}\"></textarea>\n<p class=\"editor-hint\">Save the draft as <code>{}</code> to create this page.</p>",
            escape_html(title),
            escape_html(draft_path)
        )
        .unwrap();
    }
    html
}

/// Wrap a page view in a self-contained HTML document.
#[must_use]
pub fn html_document(view: &PageView) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{STYLESHEET}</style>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(&view.title),
        view.html
    )
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_title_block() {
        assert_eq!(
            title_block("Home"),
            r#"<div class="page-title"><h2>Home</h2><div class="page-underline">━━━━</div></div>"#
        );
    }

    #[test]
    fn test_title_block_counts_characters() {
        let html = title_block("Café");

        assert!(html.contains(">━━━━<"));
    }

    #[test]
    fn test_title_block_escapes_title() {
        let html = title_block("<b>");

        assert!(html.contains("<h2>&lt;b&gt;</h2>"));
        assert!(html.contains(">━━━<"));
    }

    #[test]
    fn test_missing_page_for_reader() {
        let html = missing_page("Ghost", EditorAccess::Reader, "pages/Ghost.txt");

        assert!(html.starts_with(r#"<div class="page-title"><h2>Ghost</h2>"#));
        assert!(html.contains(MISSING_PAGE_NOTICE));
        assert!(!html.contains("<textarea"));
        assert!(!html.contains("pages/Ghost.txt"));
    }

    #[test]
    fn test_missing_page_for_admin() {
        let html = missing_page("Ghost", EditorAccess::Admin, "pages/Ghost.txt");

        assert!(html.contains(MISSING_PAGE_NOTICE));
        assert!(html.contains(r#"<textarea id="editor" data-page="Ghost"></textarea>"#));
        assert!(html.contains("<code>pages/Ghost.txt</code>"));
    }

    #[test]
    fn test_html_document() {
        let view = PageView {
            title: "A & B".to_owned(),
            html: "<p>body</p>".to_owned(),
            links: Vec::new(),
            missing_links: Vec::new(),
            missing: false,
        };

        let document = html_document(&view);

        assert!(document.starts_with("<!DOCTYPE html>"));
        assert!(document.contains("<title>A &amp; B</title>"));
        assert!(document.contains(".internal-link { font-weight: normal; }"));
        assert!(document.contains("<body>\n<p>body</p>\n</body>"));
    }

    #[test]
    fn test_editor_access_from_bool() {
        assert_eq!(EditorAccess::from(true), EditorAccess::Admin);
        assert_eq!(EditorAccess::from(false), EditorAccess::Reader);
        assert_eq!(EditorAccess::default(), EditorAccess::Reader);
    }
}
