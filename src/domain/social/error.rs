use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum SocialServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Unauthorized(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for SocialServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => SocialServiceError::Invalid(msg),
            AppError::Unauthorized(msg) => SocialServiceError::Unauthorized(msg),
            _ => SocialServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<SocialServiceError> for AppError {
    fn from(err: SocialServiceError) -> Self {
        match err {
            SocialServiceError::Invalid(msg) => AppError::BadRequest(msg),
            SocialServiceError::NotFound(what) => AppError::NotFound(format!("{} not found", what)),
            SocialServiceError::Unauthorized(msg) => AppError::Unauthorized(msg),
            SocialServiceError::Dependency(msg) => AppError::Internal(msg),
            SocialServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
