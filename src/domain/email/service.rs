use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{EmailMessage, Mailer};

const WELCOME_SUBJECT: &str = "Welcome to Splikz! 🎉";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WelcomeEmailRequest {
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WelcomeEmailResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub struct EmailService {
    mailer: Arc<dyn Mailer>,
    from: String,
    app_base_url: String,
}

impl EmailService {
    pub fn new(mailer: Arc<dyn Mailer>, from: String, app_base_url: String) -> Self {
        Self {
            mailer,
            from,
            app_base_url,
        }
    }

    fn welcome_html(&self, first_name: &str, last_name: &str) -> String {
        let greeting = format!("{} {}", first_name, last_name).trim().to_string();
        let greeting = if greeting.is_empty() {
            "there".to_string()
        } else {
            greeting
        };
        let headline = if first_name.is_empty() {
            "Welcome to Splikz!".to_string()
        } else {
            format!("Welcome to Splikz, {}!", first_name)
        };

        format!(
            r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <h1 style="font-size: 28px;">{headline} 🎬</h1>
  <p>Hey {greeting},</p>
  <p>Thank you for joining Splikz! We're thrilled to have you as part of our creative community.</p>
  <p>Get started by:</p>
  <ul>
    <li>📹 Creating your first Splik</li>
    <li>🔍 Exploring trending content</li>
    <li>👥 Following your favorite creators</li>
    <li>💬 Engaging with the community</li>
  </ul>
  <p style="text-align: center;"><a href="{base}/upload">Start Creating</a></p>
  <p style="color: #9ca3af; font-size: 12px;">You're receiving this email because you signed up for Splikz.</p>
</div>"#,
            headline = html_escape(&headline),
            greeting = html_escape(&greeting),
            base = self.app_base_url.trim_end_matches('/'),
        )
    }

    /// Send the signup welcome email. Never fails: problems are logged and
    /// reported in the response so signup can carry on.
    pub async fn send_welcome(&self, request: WelcomeEmailRequest) -> WelcomeEmailResponse {
        let email = request.email.trim();
        if email.is_empty() || !email.contains('@') {
            tracing::warn!(email = %email, "Skipping welcome email to invalid address");
            return WelcomeEmailResponse {
                success: false,
                error: Some("Invalid email address".to_string()),
            };
        }

        let message = EmailMessage {
            from: self.from.clone(),
            to: vec![email.to_string()],
            subject: WELCOME_SUBJECT.to_string(),
            html: self.welcome_html(request.first_name.trim(), request.last_name.trim()),
        };

        match self.mailer.send(message).await {
            Ok(()) => {
                tracing::info!(email = %email, "Welcome email sent");
                WelcomeEmailResponse {
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                tracing::error!(email = %email, error = %e, "Failed to send welcome email");
                WelcomeEmailResponse {
                    success: false,
                    error: Some("Email could not be sent, but signup was successful".to_string()),
                }
            }
        }
    }
}

fn html_escape(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
