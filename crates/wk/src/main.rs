//! wk CLI - Wiki markup renderer.
//!
//! Provides commands for:
//! - `render`: Render a markup file (or stdin) to an HTML fragment
//! - `page`: Render a stored page with its title block
//! - `links`: List the internal links of a stored page

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{LinksArgs, PageArgs, RenderArgs, WikiArgs};
use output::Output;

/// wk - Wiki markup renderer.
#[derive(Parser)]
#[command(name = "wk", version, about)]
struct Cli {
    #[command(flatten)]
    wiki: WikiArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markup from a file or stdin.
    Render(RenderArgs),
    /// Render a stored page.
    Page(PageArgs),
    /// List the internal links of a stored page.
    Links(LinksArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.wiki.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(&cli.wiki),
        Commands::Page(args) => args.execute(&cli.wiki),
        Commands::Links(args) => args.execute(&cli.wiki),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
