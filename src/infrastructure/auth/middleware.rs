use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

use crate::{
    domain::auth::{JwtManager, Session},
    error::AppError,
};

fn bearer_token(headers: &HeaderMap) -> Result<Option<&str>, AppError> {
    let Some(auth_header) = headers.get("authorization") else {
        return Ok(None);
    };

    let auth_header = auth_header
        .to_str()
        .map_err(|_| AppError::Unauthorized("Invalid authorization header".to_string()))?;

    auth_header
        .strip_prefix("Bearer ")
        .map(Some)
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization format".to_string()))
}

fn resolve_session(jwt: &JwtManager, headers: &HeaderMap) -> Result<Session, AppError> {
    match bearer_token(headers)? {
        None => Ok(Session::Anonymous),
        Some(token) => jwt.authenticate(token).map(Session::Authenticated),
    }
}

/// Optional authentication: anonymous callers get `Session::Anonymous`,
/// a present but invalid token is still rejected.
pub async fn session_middleware(
    State(jwt): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = resolve_session(&jwt, request.headers())?;
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}

/// Required authentication
pub async fn auth_middleware(
    State(jwt): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let session = resolve_session(&jwt, request.headers())?;
    let user = match &session {
        Session::Authenticated(user) => user.clone(),
        Session::Anonymous => {
            return Err(AppError::Unauthorized(
                "Missing authorization header".to_string(),
            ))
        }
    };

    request.extensions_mut().insert(user);
    request.extensions_mut().insert(session);

    Ok(next.run(request).await)
}
