use axum::response::{IntoResponse, Response};
use axum_helpers::AppError;
use thiserror::Error;
use uuid::Uuid;

/// Denial and failure taxonomy for directory operations.
///
/// Every authorization and store operation returns one of these; the core
/// never panics and emits no transport concepts. The handler layer maps each
/// kind to a status code via [`AppError`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum UserError {
    /// No resolvable caller identity
    #[error("User not authenticated")]
    Unauthenticated,

    /// Caller resolved but lacks rights for the operation
    #[error("Access denied: {0}")]
    Forbidden(String),

    /// Target record does not exist
    #[error("User not found: {0}")]
    NotFound(Uuid),

    #[error("User with email '{0}' already exists")]
    DuplicateEmail(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type UserResult<T> = Result<T, UserError>;

impl From<UserError> for AppError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::Unauthenticated => {
                AppError::Unauthorized("User not authenticated".to_string())
            }
            UserError::Forbidden(msg) => AppError::Forbidden(msg),
            UserError::NotFound(id) => AppError::NotFound(format!("User {} not found", id)),
            UserError::DuplicateEmail(email) => {
                AppError::Conflict(format!("User with email '{}' already exists", email))
            }
            UserError::Validation(msg) => AppError::BadRequest(msg),
            UserError::Internal(msg) => AppError::InternalServerError(msg),
        }
    }
}

impl IntoResponse for UserError {
    fn into_response(self) -> Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}
