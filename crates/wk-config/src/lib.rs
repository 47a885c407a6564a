//! Configuration management for the wiki.
//!
//! Parses `wiki.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [pages]
//! dir = "pages"
//! extension = "txt"
//! default_page = "Home"
//!
//! [render]
//! check_timeout_ms = 2000
//! max_outstanding_checks = 64
//! missing_title = "This page has not been created yet"
//!
//! [editor]
//! admin = false
//! ```
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Only `pages.dir` is expanded. Labels such as `render.missing_title` are
//! taken literally, so they may contain `$`.

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override pages directory.
    pub pages_dir: Option<PathBuf>,
    /// Override editor admin flag.
    pub admin: Option<bool>,
    /// Override page existence check timeout.
    pub check_timeout_ms: Option<u64>,
}

/// Configuration filename to search for.
pub const CONFIG_FILENAME: &str = "wiki.toml";

const DEFAULT_PAGES_DIR: &str = "pages";
const DEFAULT_EXTENSION: &str = "txt";
const DEFAULT_PAGE: &str = "Home";
const DEFAULT_CHECK_TIMEOUT_MS: u64 = 2000;
const MAX_CHECK_TIMEOUT_MS: u64 = 60_000;
const DEFAULT_MAX_OUTSTANDING_CHECKS: usize = 64;
const DEFAULT_MISSING_TITLE: &str = "This page has not been created yet";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Page store configuration (directory as a relative string from TOML).
    pages: PagesConfigRaw,
    /// Rendering configuration.
    pub render: RenderConfig,
    /// Editor configuration.
    pub editor: EditorConfig,

    /// Resolved page store configuration (set after loading).
    #[serde(skip)]
    pub pages_resolved: PagesConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Raw page store configuration as parsed from TOML.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct PagesConfigRaw {
    dir: Option<String>,
    extension: Option<String>,
    default_page: Option<String>,
}

/// Resolved page store configuration with an absolute directory.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PagesConfig {
    /// Directory holding one file per page.
    pub dir: PathBuf,
    /// Page file extension, without the dot.
    pub extension: String,
    /// Page shown when none is requested.
    pub default_page: String,
}

impl PagesConfig {
    /// Last component of the pages directory, for display.
    #[must_use]
    pub fn dir_name(&self) -> String {
        self.dir.file_name().map_or_else(
            || self.dir.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

/// Rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Bound on a single page existence check, in milliseconds.
    pub check_timeout_ms: u64,
    /// Cap on page existence checks running at the same time.
    pub max_outstanding_checks: usize,
    /// Hover label of links to pages that do not exist.
    pub missing_title: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            check_timeout_ms: DEFAULT_CHECK_TIMEOUT_MS,
            max_outstanding_checks: DEFAULT_MAX_OUTSTANDING_CHECKS,
            missing_title: DEFAULT_MISSING_TITLE.to_owned(),
        }
    }
}

impl RenderConfig {
    /// Page existence check timeout.
    #[must_use]
    pub fn check_timeout(&self) -> Duration {
        Duration::from_millis(self.check_timeout_ms)
    }
}

/// Editor configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Show the draft editor on pages that do not exist.
    pub admin: bool,
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`pages.dir`").
        field: String,
        /// Error message (e.g., "${`WIKI_PAGES`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `wiki.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_config(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(pages_dir) = &settings.pages_dir {
            self.pages_resolved.dir.clone_from(pages_dir);
        }
        if let Some(admin) = settings.admin {
            self.editor.admin = admin;
        }
        if let Some(check_timeout_ms) = settings.check_timeout_ms {
            self.render.check_timeout_ms = check_timeout_ms;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_config(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            pages: PagesConfigRaw::default(),
            render: RenderConfig::default(),
            editor: EditorConfig::default(),
            pages_resolved: PagesConfig {
                dir: base.join(DEFAULT_PAGES_DIR),
                extension: DEFAULT_EXTENSION.to_owned(),
                default_page: DEFAULT_PAGE.to_owned(),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        // Expand environment variables before path resolution
        config.expand_env_vars()?;

        let config_dir = path.parent().unwrap_or(Path::new("."));
        config.resolve_paths(config_dir);
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying
    /// CLI settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_pages()?;
        self.validate_render()?;
        Ok(())
    }

    fn validate_pages(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.pages_resolved.extension, "pages.extension")?;
        require_non_empty(&self.pages_resolved.default_page, "pages.default_page")?;
        if self.pages_resolved.extension.contains(['/', '\\']) {
            return Err(ConfigError::Validation(
                "pages.extension cannot contain path separators".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_render(&self) -> Result<(), ConfigError> {
        let timeout = self.render.check_timeout_ms;
        if timeout == 0 {
            return Err(ConfigError::Validation(
                "render.check_timeout_ms must be greater than 0".to_owned(),
            ));
        }
        if timeout > MAX_CHECK_TIMEOUT_MS {
            return Err(ConfigError::Validation(format!(
                "render.check_timeout_ms cannot exceed {MAX_CHECK_TIMEOUT_MS}"
            )));
        }
        if self.render.max_outstanding_checks == 0 {
            return Err(ConfigError::Validation(
                "render.max_outstanding_checks must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        if let Some(ref dir) = self.pages.dir {
            self.pages.dir = Some(expand::expand_env(dir, "pages.dir")?);
        }
        Ok(())
    }

    /// Resolve the pages directory against the config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let extension = self
            .pages
            .extension
            .as_deref()
            .unwrap_or(DEFAULT_EXTENSION)
            .trim_start_matches('.');

        self.pages_resolved = PagesConfig {
            dir: config_dir.join(self.pages.dir.as_deref().unwrap_or(DEFAULT_PAGES_DIR)),
            extension: extension.to_owned(),
            default_page: self
                .pages
                .default_page
                .clone()
                .unwrap_or_else(|| DEFAULT_PAGE.to_owned()),
        };
    }
}
