pub mod service;

pub use service::{EmailService, WelcomeEmailRequest, WelcomeEmailResponse};

use async_trait::async_trait;

use crate::error::AppResult;

#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub html: String,
}

/// Outbound transactional email
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: EmailMessage) -> AppResult<()>;
}
