//! Error types for i18n operations

use thiserror::Error;

/// Errors that can occur while loading catalogs or driving the client runtime.
///
/// Missing translations and malformed request input are not errors; they
/// degrade to fallbacks instead.
#[derive(Debug, Error)]
pub enum I18nError {
    /// A code outside the supported set
    #[error("Unsupported locale: {0}")]
    UnsupportedLocale(String),

    /// The default locale has no catalog entry
    #[error("No translations for the default locale '{0}'")]
    MissingDefaultLocale(String),

    /// Failed to parse a translation document
    #[error("Failed to parse translations: {0}")]
    ParseError(String),

    /// The translation runtime was used before `init`
    #[error("Translation runtime is not initialized")]
    NotInitialized,

    /// `init` failed; later operations report the same failure
    #[error("Translation runtime failed to initialize: {0}")]
    InitFailed(String),

    /// Setup was still running when the init ceiling fired
    #[error("Translation runtime not ready after {0:?}")]
    InitTimeout(std::time::Duration),

    /// The translation runtime rejected an operation
    #[error("Translation runtime error: {0}")]
    Runtime(String),

    /// Writing the persisted preference failed
    #[error("Failed to persist locale preference: {0}")]
    Persist(String),

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON encode/decode error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid scanner pattern
    #[error("Pattern error: {0}")]
    PatternError(#[from] regex::Error),

    /// Directory traversal error from the key scanner
    #[error("Walk error: {0}")]
    WalkError(#[from] walkdir::Error),
}
