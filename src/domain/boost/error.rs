use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum BoostServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("payment processor error: {0}")]
    Gateway(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("splik not found")]
    NotFound,
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    PaymentRequired(String),
    #[error("payment already used")]
    AlreadyConfirmed,
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for BoostServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => BoostServiceError::Invalid(msg),
            AppError::Unauthorized(msg) => BoostServiceError::Unauthorized(msg),
            AppError::Conflict(_) => BoostServiceError::AlreadyConfirmed,
            AppError::ExternalService(msg) => BoostServiceError::Gateway(msg),
            _ => BoostServiceError::Dependency(err.to_string()),
        }
    }
}

impl From<BoostServiceError> for AppError {
    fn from(err: BoostServiceError) -> Self {
        match err {
            BoostServiceError::Invalid(msg) => AppError::BadRequest(msg),
            BoostServiceError::NotFound => AppError::NotFound("Splik not found".to_string()),
            BoostServiceError::Unauthorized(msg) => AppError::Unauthorized(msg),
            BoostServiceError::Forbidden(msg) => AppError::Forbidden(msg),
            BoostServiceError::PaymentRequired(msg) => AppError::PaymentRequired(msg),
            BoostServiceError::AlreadyConfirmed => {
                AppError::Conflict("This payment has already been used".to_string())
            }
            BoostServiceError::Gateway(msg) => AppError::ExternalService(msg),
            BoostServiceError::Dependency(msg) => AppError::Internal(msg),
            BoostServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
