use axum::{extract::State, Json};
use std::sync::Arc;

use crate::domain::email::{EmailService, WelcomeEmailRequest, WelcomeEmailResponse};

pub struct EmailController {
    email_service: Arc<EmailService>,
}

impl EmailController {
    pub fn new(email_service: Arc<EmailService>) -> Self {
        Self { email_service }
    }

    /// POST /api/emails/welcome - Always 200 so signup is never blocked
    pub async fn welcome(
        State(controller): State<Arc<EmailController>>,
        Json(request): Json<WelcomeEmailRequest>,
    ) -> Json<WelcomeEmailResponse> {
        Json(controller.email_service.send_welcome(request).await)
    }
}
