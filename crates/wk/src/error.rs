//! CLI error types.

use wk_config::ConfigError;
use wk_renderer::RenderError;
use wk_site::WikiError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Render(#[from] RenderError),

    #[error("{0}")]
    Wiki(#[from] WikiError),

    #[error("{0}")]
    Validation(String),
}
