pub mod jwt;
pub mod session;

pub use jwt::{Claims, JwtManager};
pub use session::{AuthUser, Session};
