//! The markup-to-HTML pipeline.

use crate::blocks::{render_blocks, segment};
use crate::extract::extract_links;
use crate::link::Link;
use crate::macros::expand_macros;
use crate::rehydrate::{DEFAULT_LINK_BASE, rehydrate};

/// Error returned when rendering fails.
///
/// Malformed markup never fails a render; only broken internal invariants do.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// A link placeholder survived rehydration.
    #[error("internal link placeholder {index:?} has no matching link")]
    MalformedPlaceholder {
        /// Index carried by the placeholder, `None` if it could not be parsed.
        index: Option<usize>,
    },
}

/// Result of rendering one page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderResult {
    /// Rendered HTML fragment.
    pub html: String,
    /// Internal links in source order, one per rendered internal anchor.
    pub links: Vec<Link>,
    /// External links in source order.
    pub external_links: Vec<Link>,
}

/// Wiki markup renderer.
///
/// Runs the stages in their fixed order:
///
/// 1. link extraction (external anchors rendered, internal links shielded)
/// 2. macro expansion
/// 3. block segmentation
/// 4. internal link rehydration
///
/// The renderer holds no per-page state; one instance can render any number
/// of pages, from any number of threads.
///
/// # Example
///
/// ```
/// use wk_renderer::WikiRenderer;
///
/// let result = WikiRenderer::new().render("** Hello\n\nSee [[Home]]").unwrap();
///
/// assert_eq!(result.links.len(), 1);
/// assert!(result.html.starts_with("<h3>Hello</h3>"));
/// ```
#[derive(Clone, Debug)]
pub struct WikiRenderer {
    link_base: String,
}

impl Default for WikiRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl WikiRenderer {
    /// Create a renderer producing `?page=<name>` internal links.
    #[must_use]
    pub fn new() -> Self {
        Self {
            link_base: DEFAULT_LINK_BASE.to_owned(),
        }
    }

    /// Set the prefix internal link targets are appended to in `href`.
    #[must_use]
    pub fn with_link_base(mut self, link_base: impl Into<String>) -> Self {
        self.link_base = link_base.into();
        self
    }

    /// Render raw page markup to an HTML fragment.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::MalformedPlaceholder`] if rehydration finds a
    /// placeholder without a link. This indicates a bug, not bad input.
    pub fn render(&self, raw: &str) -> Result<RenderResult, RenderError> {
        let extraction = extract_links(raw);
        let expanded = expand_macros(&extraction.text);
        let blocks = segment(&expanded);
        tracing::debug!(
            internal_links = extraction.internal.len(),
            external_links = extraction.external.len(),
            blocks = blocks.len(),
            "Segmented page"
        );

        let html = rehydrate(&render_blocks(&blocks), &extraction.internal, &self.link_base)?;

        Ok(RenderResult {
            html,
            links: extraction.internal,
            external_links: extraction.external,
        })
    }
}

/// Render raw page markup with the default renderer.
///
/// # Errors
///
/// See [`WikiRenderer::render`].
pub fn render(raw: &str) -> Result<RenderResult, RenderError> {
    WikiRenderer::new().render(raw)
}
