//! REST error taxonomy

use qqbot_common::AppError;
use reqwest::StatusCode;

/// Category of a non-success HTTP status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    AuthenticationFailed,
    Forbidden,
    NotFound,
    MethodNotAllowed,
    /// 429: request sequence / rate limit violated
    SequenceNumber,
    Server,
}

impl ApiErrorKind {
    /// Map an HTTP status to its category; unknown statuses count as server errors
    #[must_use]
    pub fn from_status(status: StatusCode) -> Self {
        match status.as_u16() {
            401 => Self::AuthenticationFailed,
            403 => Self::Forbidden,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            429 => Self::SequenceNumber,
            _ => Self::Server,
        }
    }
}

/// REST call errors
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{status} ({kind:?}): {message}")]
    Status {
        status: StatusCode,
        kind: ApiErrorKind,
        message: String,
        /// `X-Tps-trace-Id` response header, for platform support requests
        trace_id: Option<String>,
    },

    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Credential(#[from] AppError),
}

impl ApiError {
    /// Status category, if the server answered at all
    pub fn kind(&self) -> Option<ApiErrorKind> {
        match self {
            Self::Status { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<ApiError> for AppError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Credential(inner) => inner,
            ApiError::Status {
                kind: ApiErrorKind::AuthenticationFailed,
                message,
                ..
            } => AppError::AuthenticationFailed(message),
            other => AppError::http(other),
        }
    }
}
