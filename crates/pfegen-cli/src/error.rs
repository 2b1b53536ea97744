//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Drafting error
    #[error("{0}")]
    Draft(#[from] pfegen_drafter::DraftError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Line editor failure
    #[error("Editor error: {0}")]
    Editor(String),

    /// No API key available
    #[error("No API key. Pass --api-key or set the {0} environment variable.")]
    MissingApiKey(String),

    /// No document generated yet
    #[error("No document yet. Use 'generate' first.")]
    NoDocument,
}

impl From<rustyline::error::ReadlineError> for CliError {
    fn from(e: rustyline::error::ReadlineError) -> Self {
        CliError::Editor(e.to_string())
    }
}

impl From<pfegen_domain::ListError> for CliError {
    fn from(e: pfegen_domain::ListError) -> Self {
        CliError::InvalidInput(e.to_string())
    }
}
