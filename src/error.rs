use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Error surface of the account service. Every failure a caller can see
/// is one of these kinds; transport handlers map them to status codes.
#[derive(Debug, Error)]
pub enum AccountError {
    #[error("no account provided")]
    NoAccountProvided,
    /// Message lists every violating field, not just the first one found.
    #[error("invalid account fields: {0}")]
    ValidationFailed(String),
    #[error("account already exists")]
    AlreadyExists,
    #[error("password not equal to confirmed password")]
    PasswordMismatch,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("account not found")]
    NotFound,
    #[error("no username provided")]
    NoUsernameProvided,
    #[error("no password provided")]
    NoPasswordProvided,
    #[error("invalid username provided")]
    InvalidUsername,
    #[error("invalid password provided")]
    InvalidPassword,
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<sqlx::Error> for AccountError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => AccountError::NotFound,
            // The unique indexes on username/email are the real uniqueness
            // boundary; a violation surfaces as the same kind the pre-check
            // returns.
            sqlx::Error::Database(db)
                if matches!(db.kind(), sqlx::error::ErrorKind::UniqueViolation) =>
            {
                AccountError::AlreadyExists
            }
            _ => AccountError::Storage(err.to_string()),
        }
    }
}

impl IntoResponse for AccountError {
    fn into_response(self) -> Response {
        let status = match &self {
            AccountError::NoAccountProvided
            | AccountError::ValidationFailed(_)
            | AccountError::PasswordMismatch
            | AccountError::NoUsernameProvided
            | AccountError::NoPasswordProvided => StatusCode::BAD_REQUEST,
            AccountError::AlreadyExists => StatusCode::CONFLICT,
            AccountError::NotFound => StatusCode::NOT_FOUND,
            AccountError::InvalidUsername | AccountError::InvalidPassword => {
                StatusCode::UNAUTHORIZED
            }
            AccountError::Hashing(_) | AccountError::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
