use thiserror::Error;

use crate::records::RecordError;

pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Handler-boundary error categories. Each maps to exactly one status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Malformed or missing body, or a missing path parameter.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// No usable caller identity.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Caller identity present but not the resource owner.
    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    /// Store or serialization failure. The detail is for logs only.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unauthorized(_) => 401,
            Self::Forbidden(_) => 403,
            Self::NotFound(_) => 404,
            Self::Internal(_) => 500,
        }
    }

    /// The message placed in the `{error}` response body.
    pub fn public_message(&self) -> &str {
        match self {
            Self::BadRequest(message)
            | Self::Unauthorized(message)
            | Self::Forbidden(message)
            | Self::NotFound(message) => message,
            Self::Internal(_) => INTERNAL_ERROR_MESSAGE,
        }
    }
}

impl From<RecordError> for ApiError {
    fn from(error: RecordError) -> Self {
        Self::Internal(error.to_string())
    }
}
