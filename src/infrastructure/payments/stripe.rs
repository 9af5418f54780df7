use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::boost::{BoostMetadata, PaymentGateway, PaymentIntent};
use crate::error::{AppError, AppResult};

const CURRENCY: &str = "usd";

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: Option<String>,
}

/// Payment intents over the Stripe REST API
pub struct StripeClient {
    secret_key: String,
    api_base: String,
    http_client: reqwest::Client,
}

impl StripeClient {
    pub fn new(secret_key: String, api_base: String) -> Self {
        Self {
            secret_key,
            api_base: api_base.trim_end_matches('/').to_string(),
            http_client: reqwest::Client::new(),
        }
    }

    async fn parse(response: reqwest::Response, action: &str) -> AppResult<PaymentIntent> {
        if !response.status().is_success() {
            let status = response.status();
            let message = response
                .json::<StripeErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| "Unknown error".to_string());
            tracing::error!(status = %status, message = %message, "Stripe {} failed", action);

            return Err(if status.is_client_error() && status.as_u16() != 401 {
                AppError::BadRequest(message)
            } else {
                AppError::ExternalService(format!("Stripe {} failed: {}", action, message))
            });
        }

        response
            .json::<PaymentIntent>()
            .await
            .map_err(|e| AppError::ExternalService(format!("Failed to parse Stripe response: {}", e)))
    }
}

#[async_trait]
impl PaymentGateway for StripeClient {
    async fn create_intent(
        &self,
        amount_cents: i64,
        metadata: &BoostMetadata,
    ) -> AppResult<PaymentIntent> {
        let mut params: Vec<(String, String)> = vec![
            ("amount".to_string(), amount_cents.to_string()),
            ("currency".to_string(), CURRENCY.to_string()),
            (
                "automatic_payment_methods[enabled]".to_string(),
                "true".to_string(),
            ),
        ];
        let mut entries: Vec<_> = metadata.to_map().into_iter().collect();
        entries.sort();
        params.extend(
            entries
                .into_iter()
                .map(|(key, value)| (format!("metadata[{}]", key), value)),
        );

        let response = self
            .http_client
            .post(format!("{}/v1/payment_intents", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Stripe request failed: {}", e)))?;

        Self::parse(response, "create payment intent").await
    }

    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent> {
        let response = self
            .http_client
            .get(format!(
                "{}/v1/payment_intents/{}",
                self.api_base,
                urlencoding::encode(intent_id)
            ))
            .bearer_auth(&self.secret_key)
            .send()
            .await
            .map_err(|e| AppError::ExternalService(format!("Stripe request failed: {}", e)))?;

        Self::parse(response, "retrieve payment intent").await
    }
}
