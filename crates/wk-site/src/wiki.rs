//! Wiki facade: page store, renderer and missing-page resolver together.

use std::sync::Arc;
use std::time::Duration;

use wk_renderer::{DEFAULT_LINK_BASE, Link, RenderError, WikiRenderer};
use wk_storage::{DEFAULT_EXTENSION, Storage};

use crate::page::{EditorAccess, PageView, missing_page, title_block};
use crate::query::page_from_query;
use crate::resolver::{
    DEFAULT_CHECK_TIMEOUT, DEFAULT_MAX_OUTSTANDING_CHECKS, DEFAULT_MISSING_TITLE,
    MissingPageResolver,
};

/// Default page shown when none is requested.
pub const DEFAULT_PAGE: &str = "Home";

/// Error returned when a page cannot be shown.
#[derive(Debug, thiserror::Error)]
pub enum WikiError {
    /// The stored markup could not be rendered.
    #[error("failed to render page {page}")]
    Render {
        /// Page being rendered.
        page: String,
        /// Underlying render error.
        #[source]
        source: RenderError,
    },
}

/// Settings of a [`Wiki`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WikiConfig {
    /// Prefix of internal link `href` values.
    pub link_base: String,
    /// Page shown when none is requested.
    pub default_page: String,
    /// Bound on a single page existence check.
    pub check_timeout: Duration,
    /// Cap on page existence checks running at the same time.
    pub max_outstanding_checks: usize,
    /// Hover label of links to missing pages.
    pub missing_title: String,
    /// Directory name shown in the draft hint of a missing page.
    pub pages_dir_name: String,
    /// Page file extension shown in the draft hint.
    pub extension: String,
}

impl Default for WikiConfig {
    fn default() -> Self {
        Self {
            link_base: DEFAULT_LINK_BASE.to_owned(),
            default_page: DEFAULT_PAGE.to_owned(),
            check_timeout: DEFAULT_CHECK_TIMEOUT,
            max_outstanding_checks: DEFAULT_MAX_OUTSTANDING_CHECKS,
            missing_title: DEFAULT_MISSING_TITLE.to_owned(),
            pages_dir_name: "pages".to_owned(),
            extension: DEFAULT_EXTENSION.to_owned(),
        }
    }
}

impl WikiConfig {
    /// File a draft of `page` should be saved as, relative to the wiki root.
    #[must_use]
    pub fn draft_path(&self, page: &str) -> String {
        format!("{}/{page}.{}", self.pages_dir_name, self.extension)
    }
}

/// Rendered markup with missing links marked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    /// HTML fragment.
    pub html: String,
    /// Internal links in source order.
    pub links: Vec<Link>,
    /// External links in source order.
    pub external_links: Vec<Link>,
    /// Linked pages that do not exist, sorted.
    pub missing: Vec<String>,
}

/// A wiki backed by a page store.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use wk_site::{EditorAccess, Wiki, WikiConfig};
/// use wk_storage::FsStorage;
///
/// let dir = std::env::temp_dir().join("wk-site-doc");
/// std::fs::create_dir_all(&dir).unwrap();
/// std::fs::write(dir.join("Home.txt"), "** Welcome").unwrap();
///
/// let wiki = Wiki::new(Arc::new(FsStorage::new(dir)), WikiConfig::default());
/// let view = wiki.page("Home", EditorAccess::Reader).unwrap();
///
/// assert!(view.html.contains("<h3>Welcome</h3>"));
/// ```
pub struct Wiki {
    storage: Arc<dyn Storage>,
    renderer: WikiRenderer,
    resolver: MissingPageResolver,
    config: WikiConfig,
}

impl std::fmt::Debug for Wiki {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wiki")
            .field("renderer", &self.renderer)
            .field("resolver", &self.resolver)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Wiki {
    /// Create a wiki reading pages from `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn Storage>, config: WikiConfig) -> Self {
        let renderer = WikiRenderer::new().with_link_base(config.link_base.clone());
        let resolver = MissingPageResolver::new(Arc::clone(&storage))
            .with_timeout(config.check_timeout)
            .with_max_outstanding_checks(config.max_outstanding_checks)
            .with_missing_title(config.missing_title.clone());
        Self {
            storage,
            renderer,
            resolver,
            config,
        }
    }

    /// Wiki settings.
    #[must_use]
    pub fn config(&self) -> &WikiConfig {
        &self.config
    }

    /// Render markup and mark links to pages that do not exist.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the renderer breaks its own invariants.
    pub fn render_text(&self, raw: &str) -> Result<RenderedPage, RenderError> {
        let rendered = self.renderer.render(raw)?;
        let resolution = self.resolver.resolve(&rendered.html);
        Ok(RenderedPage {
            html: resolution.html,
            links: rendered.links,
            external_links: rendered.external_links,
            missing: resolution.missing,
        })
    }

    /// Render markup without checking the page store.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the renderer breaks its own invariants.
    pub fn render_unresolved(&self, raw: &str) -> Result<RenderedPage, RenderError> {
        let rendered = self.renderer.render(raw)?;
        Ok(RenderedPage {
            html: rendered.html,
            links: rendered.links,
            external_links: rendered.external_links,
            missing: Vec::new(),
        })
    }

    /// Load and render a page.
    ///
    /// A blank name selects the default page. Any other name is used as
    /// given. A page the store cannot read is shown as the missing-page view.
    ///
    /// # Errors
    ///
    /// Returns [`WikiError::Render`] if the stored markup fails to render.
    pub fn page(&self, name: &str, access: EditorAccess) -> Result<PageView, WikiError> {
        let name = if name.trim().is_empty() {
            self.config.default_page.as_str()
        } else {
            name
        };

        let raw = match self.storage.read(name) {
            Ok(raw) => raw,
            Err(error) => {
                if error.is_not_found() {
                    tracing::info!(page = name, "Page not found");
                } else {
                    tracing::warn!(page = name, %error, "Failed to read page");
                }
                return Ok(PageView {
                    title: name.to_owned(),
                    html: missing_page(name, access, &self.config.draft_path(name)),
                    links: Vec::new(),
                    missing_links: Vec::new(),
                    missing: true,
                });
            }
        };
        tracing::info!(page = name, bytes = raw.len(), "Loaded page");

        let rendered = self.render_text(&raw).map_err(|source| WikiError::Render {
            page: name.to_owned(),
            source,
        })?;

        Ok(PageView {
            title: name.to_owned(),
            html: format!("{}\n{}", title_block(name), rendered.html),
            links: rendered.links,
            missing_links: rendered.missing,
            missing: false,
        })
    }

    /// Load the page a query string selects.
    ///
    /// # Errors
    ///
    /// See [`Wiki::page`].
    pub fn page_for_query(
        &self,
        query: &str,
        access: EditorAccess,
    ) -> Result<PageView, WikiError> {
        let name = page_from_query(query, &self.config.default_page);
        self.page(&name, access)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use wk_storage::MockStorage;

    use super::*;

    fn wiki(storage: MockStorage) -> Wiki {
        Wiki::new(Arc::new(storage), WikiConfig::default())
    }

    #[test]
    fn test_render_text_marks_missing() {
        let wiki = wiki(MockStorage::new().with_page("Home", ""));

        let page = wiki.render_text("[[Home]] [[Ghost]]").unwrap();

        assert_eq!(page.missing, vec!["Ghost".to_owned()]);
        assert_eq!(page.links.len(), 2);
        assert_eq!(page.html.matches("internal-link missing").count(), 1);
    }

    #[test]
    fn test_render_unresolved_skips_store() {
        let storage = Arc::new(MockStorage::new());
        let wiki = Wiki::new(
            Arc::clone(&storage) as Arc<dyn Storage>,
            WikiConfig::default(),
        );

        let page = wiki.render_unresolved("[[Ghost]]").unwrap();

        assert!(page.missing.is_empty());
        assert!(!page.html.contains("missing"));
        assert_eq!(storage.exists_calls(), 0);
    }

    #[test]
    fn test_page_view() {
        let wiki = wiki(MockStorage::new().with_page("Home", "** Hi\n[[Home]]"));

        let view = wiki.page("Home", EditorAccess::Reader).unwrap();

        assert!(!view.missing);
        assert!(view.missing_links.is_empty());
        assert_eq!(view.title, "Home");
        assert_eq!(
            view.html,
            concat!(
                r#"<div class="page-title"><h2>Home</h2><div class="page-underline">━━━━</div></div>"#,
                "\n<h3>Hi</h3>\n",
                r#"<p><a class="internal-link" href="?page=Home" data-page="Home">Home</a></p>"#
            )
        );
        assert_eq!(view.links, vec![Link::internal("Home", "Home")]);
    }

    #[test]
    fn test_blank_name_selects_default_page() {
        let wiki = wiki(MockStorage::new().with_page("Home", "welcome"));

        let view = wiki.page("  ", EditorAccess::Reader).unwrap();

        assert_eq!(view.title, "Home");
        assert!(!view.missing);
    }

    #[test]
    fn test_missing_page_view() {
        let wiki = wiki(MockStorage::new());

        let reader = wiki.page("Ghost", EditorAccess::Reader).unwrap();
        let admin = wiki.page("Ghost", EditorAccess::Admin).unwrap();

        assert!(reader.missing);
        assert!(!reader.html.contains("<textarea"));
        assert!(admin.html.contains(r#"<textarea id="editor""#));
        assert!(admin.html.contains("<code>pages/Ghost.txt</code>"));
    }

    #[test]
    fn test_unreadable_page_shown_as_missing() {
        let wiki = wiki(MockStorage::new().with_page("Locked", "x").with_failure("Locked"));

        let view = wiki.page("Locked", EditorAccess::Reader).unwrap();

        assert!(view.missing);
        assert!(view.links.is_empty());
    }

    #[test]
    fn test_page_for_query() {
        let wiki = wiki(
            MockStorage::new()
                .with_page("Home", "home")
                .with_page("Meeting Notes", "notes"),
        );

        let view = wiki
            .page_for_query("?page=Meeting%20Notes", EditorAccess::Reader)
            .unwrap();
        let default = wiki.page_for_query("", EditorAccess::Reader).unwrap();

        assert_eq!(view.title, "Meeting Notes");
        assert!(view.html.ends_with("<p>notes</p>"));
        assert_eq!(default.title, "Home");
    }

    #[test]
    fn test_link_and_query_name_same_page() {
        let wiki = wiki(MockStorage::new().with_page(" Foo ", "spaced"));

        let page = wiki.render_text("[[ Foo ]]").unwrap();
        let href = page
            .html
            .split(r#"href=""#)
            .nth(1)
            .and_then(|rest| rest.split('"').next())
            .unwrap();
        let view = wiki.page_for_query(href, EditorAccess::Reader).unwrap();

        assert!(page.missing.is_empty());
        assert_eq!(href, "?page=%20Foo%20");
        assert_eq!(view.title, " Foo ");
        assert!(!view.missing);
    }

    #[test]
    fn test_custom_config() {
        let config = WikiConfig {
            link_base: "/wiki?page=".to_owned(),
            missing_title: "Nope".to_owned(),
            pages_dir_name: "notes".to_owned(),
            extension: "wiki".to_owned(),
            ..WikiConfig::default()
        };
        let wiki = Wiki::new(Arc::new(MockStorage::new()), config);

        let page = wiki.render_text("[[Ghost]]").unwrap();
        let view = wiki.page("Ghost", EditorAccess::Admin).unwrap();

        assert!(page.html.contains(r#"title="Nope" href="/wiki?page=Ghost""#));
        assert!(view.html.contains("<code>notes/Ghost.wiki</code>"));
    }
}
