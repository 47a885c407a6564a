//! CLI command implementations.

pub(crate) mod links;
pub(crate) mod page;
pub(crate) mod render;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use wk_config::{CliSettings, Config};
use wk_site::{EditorAccess, Wiki, WikiConfig};
use wk_storage::FsStorage;

use crate::error::CliError;

pub(crate) use links::LinksArgs;
pub(crate) use page::PageArgs;
pub(crate) use render::RenderArgs;

/// Options shared by every command.
#[derive(Args)]
pub(crate) struct WikiArgs {
    /// Path to configuration file (default: auto-discover wiki.toml).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Pages directory (overrides config).
    #[arg(short, long, global = true, env = "WK_PAGES_DIR")]
    pages_dir: Option<PathBuf>,

    /// Show the draft editor on pages that do not exist (overrides config).
    #[arg(long, global = true)]
    admin: bool,

    /// Page existence check timeout in milliseconds (overrides config).
    #[arg(long, global = true)]
    check_timeout_ms: Option<u64>,

    /// Enable verbose output (page loads and failed existence checks).
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// A wiki opened from configuration.
pub(crate) struct OpenWiki {
    pub wiki: Wiki,
    pub config: Config,
}

impl OpenWiki {
    /// Editor access granted by configuration.
    pub(crate) fn access(&self) -> EditorAccess {
        EditorAccess::from(self.config.editor.admin)
    }
}

impl WikiArgs {
    /// Load configuration with command line overrides applied.
    fn load_config(&self) -> Result<Config, CliError> {
        let cli_settings = CliSettings {
            pages_dir: self.pages_dir.clone(),
            admin: self.admin.then_some(true),
            check_timeout_ms: self.check_timeout_ms,
        };
        Ok(Config::load(self.config.as_deref(), Some(&cli_settings))?)
    }

    /// Open the wiki described by configuration.
    pub(crate) fn open(&self) -> Result<OpenWiki, CliError> {
        let config = self.load_config()?;
        let storage = FsStorage::with_extension(
            config.pages_resolved.dir.clone(),
            config.pages_resolved.extension.clone(),
        );
        tracing::info!(
            pages_dir = %storage.pages_dir().display(),
            config = ?config.config_path,
            "Opening wiki"
        );

        let wiki = Wiki::new(Arc::new(storage), wiki_config(&config));
        Ok(OpenWiki { wiki, config })
    }
}

/// Map loaded configuration to wiki settings.
fn wiki_config(config: &Config) -> WikiConfig {
    WikiConfig {
        default_page: config.pages_resolved.default_page.clone(),
        check_timeout: config.render.check_timeout(),
        max_outstanding_checks: config.render.max_outstanding_checks,
        missing_title: config.render.missing_title.clone(),
        pages_dir_name: config.pages_resolved.dir_name(),
        extension: config.pages_resolved.extension.clone(),
        ..WikiConfig::default()
    }
}
