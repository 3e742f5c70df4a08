//! Error types for the Viessmann SDK

use crate::auth::AuthError;
use thiserror::Error;

/// Main error type for SDK operations
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP client error
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Token could not be obtained
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Check if the request never reached the server or its response was lost
    pub fn is_network(&self) -> bool {
        match self {
            ApiError::HttpClient(_) => true,
            ApiError::Auth(e) => e.is_transport(),
        }
    }
}
