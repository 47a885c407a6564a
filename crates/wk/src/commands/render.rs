//! `wk render` command implementation.

use std::path::{Path, PathBuf};

use clap::Args;

use super::WikiArgs;
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markup file to render, or `-` for stdin.
    input: PathBuf,

    /// Do not check linked pages against the page store.
    #[arg(long)]
    no_resolve: bool,
}

impl RenderArgs {
    /// Execute the render command.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or configuration fails.
    pub(crate) fn execute(self, wiki_args: &WikiArgs) -> Result<(), CliError> {
        let output = Output::new();
        let open = wiki_args.open()?;
        let raw = read_input(&self.input)?;

        let rendered = if self.no_resolve {
            open.wiki.render_unresolved(&raw)?
        } else {
            open.wiki.render_text(&raw)?
        };
        Output::result(&rendered.html)?;

        if !rendered.missing.is_empty() {
            output.warning(&format!(
                "Missing pages: {}",
                rendered.missing.join(", ")
            ));
        }

        Ok(())
    }
}

/// Read markup from a file, or stdin for `-`.
fn read_input(input: &Path) -> Result<String, CliError> {
    if input == Path::new("-") {
        return Ok(std::io::read_to_string(std::io::stdin())?);
    }
    Ok(std::fs::read_to_string(input)?)
}
