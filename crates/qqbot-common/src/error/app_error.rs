//! Application error types
//!
//! Process-level taxonomy shared by the REST collaborator, the credential
//! lifecycle and the gateway bootstrap.

use std::fmt;

use crate::config::ConfigError;

/// Application-wide error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Startup
    #[error("Configuration error: {0}")]
    Config(String),

    // Credential errors
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Access token refresh failed: {0}")]
    TokenRefresh(String),

    // Capacity errors
    #[error("Session limit exceeded: {shards} shards requested, {remaining} session starts remaining")]
    SessionLimitExceeded { shards: u32, remaining: u32 },

    // Platform
    #[error("HTTP error: {0}")]
    Http(String),

    // Everything else
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AppError {
    /// Check whether this error must abort the process instead of being retried
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Config(_) | Self::SessionLimitExceeded { .. })
    }

    /// Get a short error code for logs
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            Self::TokenRefresh(_) => "TOKEN_REFRESH_FAILED",
            Self::SessionLimitExceeded { .. } => "SESSION_LIMIT_EXCEEDED",
            Self::Http(_) => "HTTP_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Create an HTTP error from anything displayable
    #[must_use]
    pub fn http(msg: impl fmt::Display) -> Self {
        Self::Http(msg.to_string())
    }

    /// Wrap an unexpected failure
    pub fn internal(err: impl Into<anyhow::Error>) -> Self {
        Self::Internal(err.into())
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
