//! Page selection from a request query string.

use wk_renderer::decode_page;

/// Query parameter naming the requested page.
pub const PAGE_PARAMETER: &str = "page";

/// Extract the requested page from a query string like `?page=Meeting%20Notes`.
///
/// The leading `?` is optional and `+` decodes to a space. The decoded name
/// is kept verbatim, surrounding spaces included, so it names the same page
/// as the link it came from. Falls back to `default_page` when the parameter
/// is absent or blank.
///
/// # Examples
///
/// ```
/// use wk_site::page_from_query;
///
/// assert_eq!(page_from_query("?page=Meeting%20Notes", "Home"), "Meeting Notes");
/// assert_eq!(page_from_query("", "Home"), "Home");
/// ```
#[must_use]
pub fn page_from_query(query: &str, default_page: &str) -> String {
    let query = query.strip_prefix('?').unwrap_or(query);
    query
        .split('&')
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
        .find(|(key, _)| *key == PAGE_PARAMETER)
        .map(|(_, value)| decode_page(&value.replace('+', " ")).into_owned())
        .filter(|page| !page.trim().is_empty())
        .unwrap_or_else(|| default_page.to_owned())
}
