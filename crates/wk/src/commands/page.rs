//! `wk page` command implementation.

use clap::Args;
use wk_site::html_document;

use super::WikiArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the page command.
#[derive(Args)]
pub(crate) struct PageArgs {
    /// Page name (default: the configured default page).
    name: Option<String>,

    /// Emit a complete HTML document with styles.
    #[arg(long)]
    standalone: bool,
}

impl PageArgs {
    /// Execute the page command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails or the page cannot be rendered.
    pub(crate) fn execute(self, wiki_args: &WikiArgs) -> Result<(), CliError> {
        let output = Output::new();
        let open = wiki_args.open()?;
        let name = self.name.unwrap_or_default();

        let view = open.wiki.page(&name, open.access())?;
        if view.missing {
            output.warning(&format!(
                "Page {} does not exist yet ({})",
                view.title,
                open.wiki.config().draft_path(&view.title)
            ));
        }

        if self.standalone {
            Output::result(&html_document(&view))?;
        } else {
            Output::result(&view.html)?;
        }
        Ok(())
    }
}
