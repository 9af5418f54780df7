use crate::error::{AppError, AppResult};
use uuid::Uuid;

/// Authenticated caller, resolved from the access token
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: Option<String>,
}

/// Per-request session context.
///
/// Every request gets one, signed in or not. Services receive it by reference
/// and decide for themselves whether an action needs a user.
#[derive(Debug, Clone, PartialEq)]
pub enum Session {
    Anonymous,
    Authenticated(AuthUser),
}

impl Session {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            Session::Anonymous => None,
            Session::Authenticated(user) => Some(user),
        }
    }

    pub fn user_id(&self) -> Option<Uuid> {
        self.user().map(|u| u.user_id)
    }

    /// Block an action for anonymous callers before any external call is made
    pub fn require_user(&self, action: &str) -> AppResult<&AuthUser> {
        self.user()
            .ok_or_else(|| AppError::Unauthorized(format!("Please sign in to {}", action)))
    }
}

impl From<AuthUser> for Session {
    fn from(user: AuthUser) -> Self {
        Session::Authenticated(user)
    }
}
