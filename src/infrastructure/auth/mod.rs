pub mod middleware;
pub mod request_id;

pub use crate::domain::auth::{AuthUser, Session};
pub use middleware::{auth_middleware, session_middleware};
pub use request_id::{request_id_middleware, RequestId};
