//! Page loading and display for the wiki.
//!
//! Ties the [`wk_renderer`] pipeline to a [`wk_storage::Storage`] page store:
//!
//! - [`MissingPageResolver`]: marks internal links whose page does not exist,
//!   checking distinct targets concurrently with a per-check timeout
//! - [`Wiki`]: loads a page, renders it and wraps it in a [`PageView`]
//! - [`page_from_query`]: selects a page from a `?page=...` query string
//!
//! A page that cannot be read is shown as a missing-page view. Admins get a
//! draft editor there; see [`EditorAccess`].

mod page;
mod query;
mod resolver;
mod wiki;

pub use page::{
    EditorAccess, MISSING_PAGE_NOTICE, PageView, STYLESHEET, TITLE_UNDERLINE, html_document,
    missing_page, title_block,
};
pub use query::{PAGE_PARAMETER, page_from_query};
pub use resolver::{
    DEFAULT_CHECK_TIMEOUT, DEFAULT_MAX_OUTSTANDING_CHECKS, DEFAULT_MISSING_TITLE, MISSING_CLASS,
    MissingPageResolver, Resolution,
};
pub use wiki::{DEFAULT_PAGE, RenderedPage, Wiki, WikiConfig, WikiError};
