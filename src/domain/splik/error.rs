use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SplikServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("file too large: {0}")]
    TooLarge(String),
    #[error("splik not found")]
    NotFound,
    #[error("comment not found")]
    CommentNotFound,
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for SplikServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => SplikServiceError::Invalid(msg),
            AppError::PayloadTooLarge(msg) => SplikServiceError::TooLarge(msg),
            AppError::NotFound(_) => SplikServiceError::NotFound,
            AppError::Unauthorized(msg) => SplikServiceError::Unauthorized(msg),
            AppError::Forbidden(msg) => SplikServiceError::Forbidden(msg),
            _ => SplikServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<SplikServiceError> for AppError {
    fn from(err: SplikServiceError) -> Self {
        match err {
            SplikServiceError::Invalid(msg) => AppError::BadRequest(msg),
            SplikServiceError::TooLarge(msg) => AppError::PayloadTooLarge(msg),
            SplikServiceError::NotFound => AppError::NotFound("Splik not found".to_string()),
            SplikServiceError::CommentNotFound => {
                AppError::NotFound("Comment not found".to_string())
            }
            SplikServiceError::Unauthorized(msg) => AppError::Unauthorized(msg),
            SplikServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            SplikServiceError::Dependency(msg) => AppError::Internal(msg),
            SplikServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
