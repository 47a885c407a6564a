//! Wiki markup to HTML renderer.
//!
//! This crate turns the wiki dialect into an HTML fragment. The
//! [`WikiRenderer`] runs four stages in a fixed order:
//!
//! - [`extract_links`]: renders external `[[...]]` links and swaps internal
//!   ones for opaque placeholders
//! - [`expand_macros`]: `&bold(){...}` and `&br()`
//! - [`segment`] and [`render_blocks`]: headings, lists, paragraphs and
//!   blank-line markers
//! - [`rehydrate`]: placeholders back to internal anchors
//!
//! Hiding internal links before the structural stages keeps page names like
//! `** Foo` or `- item` from being read as markup.
//!
//! Checking whether linked pages exist is left to the caller; see the
//! `wk-site` crate.
//!
//! # Example
//!
//! ```
//! use wk_renderer::render;
//!
//! let result = render("** Welcome\nSee &bold(){[[Start>Getting Started]]}").unwrap();
//!
//! assert!(result.html.contains("<h3>Welcome</h3>"));
//! assert_eq!(result.links[0].target, "Getting Started");
//! ```

mod blocks;
mod extract;
mod link;
mod macros;
mod rehydrate;
mod renderer;
mod util;

pub use blocks::{
    BLANK_LINE_CLASS, Block, DESCRIPTION_CLASS, HeadingLevel, ListItem, render_blocks, segment,
};
pub use extract::{EXTERNAL_LINK_CLASS, Extraction, extract_links};
pub use link::{Link, LinkKind};
pub use macros::expand_macros;
pub use rehydrate::{
    DEFAULT_LINK_BASE, INTERNAL_LINK_CLASS, PAGE_ATTRIBUTE, internal_anchor, rehydrate,
};
pub use renderer::{RenderError, RenderResult, WikiRenderer, render};
pub use util::{decode_page, encode_page, escape_html};
