//! Error types for the vsquery CLI

use color_eyre::eyre::Report;
use thiserror::Error;

/// CLI error type with minimal variants
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file or environment issues
    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    /// API communication errors
    #[error("API error: {0}")]
    Api(#[from] vsquery_sdk::ApiError),

    /// Authentication/token cache issues
    #[error(transparent)]
    Auth(#[from] vsquery_sdk::AuthError),

    /// Everything else (using color-eyre's Report for rich errors)
    #[error(transparent)]
    Internal(#[from] Report),
}

impl CliError {
    pub fn internal(message: impl Into<String>) -> Self {
        CliError::Internal(Report::msg(message.into()))
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
