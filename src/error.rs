use axum::http::StatusCode;
use thiserror::Error;

/// Failures surfaced by the identity store and the report lifecycle.
///
/// Every variant is recoverable: services hand it back to the caller and the
/// HTTP edge turns it into a status code with a short message.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("no active session")]
    Unauthenticated,

    #[error("role not allowed to change report status")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    /// The stored entry exists but is not the shape we expect.
    #[error("malformed persisted data under key `{key}`: {reason}")]
    MalformedPersistedData { key: String, reason: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Storage backend or credential hashing failed.
    #[error("internal error: {0:#}")]
    Internal(#[from] anyhow::Error),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::DuplicateEmail => StatusCode::CONFLICT,
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::MalformedPersistedData { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Rejection used by every handler.
pub fn reject(e: AppError) -> (StatusCode, String) {
    let status = e.status_code();
    if status.is_server_error() {
        tracing::error!(error = %e, "request failed");
    } else {
        tracing::warn!(error = %e, %status, "request rejected");
    }
    (status, e.to_string())
}
