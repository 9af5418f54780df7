use async_trait::async_trait;
use serde::Serialize;

use crate::domain::email::{EmailMessage, Mailer};
use crate::error::{AppError, AppResult};

const RESEND_EMAILS_URL: &str = "https://api.resend.com/emails";

#[derive(Debug, Serialize)]
struct SendEmailBody<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

pub struct ResendMailer {
    api_key: String,
    http_client: reqwest::Client,
}

impl ResendMailer {
    pub fn new(api_key: String) -> Self {
        Self {
            api_key,
            http_client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        let response = self
            .http_client
            .post(RESEND_EMAILS_URL)
            .bearer_auth(&self.api_key)
            .json(&SendEmailBody {
                from: &message.from,
                to: &message.to,
                subject: &message.subject,
                html: &message.html,
            })
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Resend request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalService(format!(
                "Resend returned {}: {}",
                status, error_text
            )));
        }

        Ok(())
    }
}

/// Used when no email provider is configured
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: EmailMessage) -> AppResult<()> {
        tracing::info!(
            to = ?message.to,
            subject = %message.subject,
            "Email provider not configured, skipping send"
        );
        Ok(())
    }
}
