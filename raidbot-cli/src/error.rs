//! Error types for the RaidBot CLI.

use std::fmt;

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// CLI error types.
#[derive(Debug)]
pub enum CliError {
    /// Site configuration could not be loaded or is invalid
    Config(String),

    /// Translation catalog or audit failure
    I18n(String),

    /// The HTTP server stopped with an error
    Server(String),

    /// Invalid argument
    InvalidArgument(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::I18n(msg) => write!(f, "Translation error: {}", msg),
            CliError::Server(msg) => write!(f, "Server error: {}", msg),
            CliError::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl From<raidbot_config::ConfigError> for CliError {
    fn from(e: raidbot_config::ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<raidbot_i18n::I18nError> for CliError {
    fn from(e: raidbot_i18n::I18nError) -> Self {
        CliError::I18n(e.to_string())
    }
}

impl From<raidbot_core::Error> for CliError {
    fn from(e: raidbot_core::Error) -> Self {
        CliError::Server(e.to_string())
    }
}
