//! `wk links` command implementation.

use clap::Args;
use wk_renderer::Link;

use super::WikiArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the links command.
#[derive(Args)]
pub(crate) struct LinksArgs {
    /// Page name (default: the configured default page).
    name: Option<String>,
}

impl LinksArgs {
    /// Execute the links command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, the page does not exist, or
    /// it cannot be rendered.
    pub(crate) fn execute(self, wiki_args: &WikiArgs) -> Result<(), CliError> {
        let output = Output::new();
        let open = wiki_args.open()?;
        let name = self.name.unwrap_or_default();

        let view = open.wiki.page(&name, open.access())?;
        if view.missing {
            return Err(CliError::Validation(format!(
                "Page {} does not exist",
                view.title
            )));
        }

        output.highlight(&format!("Links on {}", view.title));
        Output::result(&format_links(&view.links, &view.missing_links))?;
        if !view.missing_links.is_empty() {
            output.warning(&format!("{} missing page(s)", view.missing_links.len()));
        }
        Ok(())
    }
}

/// One line per link: target, label when it differs, and a missing marker.
fn format_links(links: &[Link], missing: &[String]) -> String {
    if links.is_empty() {
        return "(no links)".to_owned();
    }
    links
        .iter()
        .map(|link| {
            let mut line = link.target.clone();
            if link.label != link.target {
                line.push_str(&format!(" ({})", link.label));
            }
            if missing.iter().any(|page| *page == link.target) {
                line.push_str(" [missing]");
            }
            line
        })
        .collect::<Vec<_>>()
        .join("\n")
}
