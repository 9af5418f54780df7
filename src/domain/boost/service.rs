use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::error::BoostServiceError;
use super::{
    BoostLevel, BoostMetadata, BoostRepository, ConfirmPaymentResponse, NewBoost, PaymentGateway,
    PaymentIntentResponse, INTENT_STATUS_SUCCEEDED,
};
use crate::domain::auth::Session;
use crate::domain::splik::SplikRepository;

pub struct BoostService {
    boost_repo: Arc<dyn BoostRepository>,
    splik_repo: Arc<dyn SplikRepository>,
    payments: Arc<dyn PaymentGateway>,
}

impl BoostService {
    pub fn new(
        boost_repo: Arc<dyn BoostRepository>,
        splik_repo: Arc<dyn SplikRepository>,
        payments: Arc<dyn PaymentGateway>,
    ) -> Self {
        Self {
            boost_repo,
            splik_repo,
            payments,
        }
    }

    fn parse_level(level: &str) -> Result<BoostLevel, BoostServiceError> {
        level
            .parse()
            .map_err(|e: super::UnknownBoostLevel| BoostServiceError::Invalid(e.to_string()))
    }
}

#[async_trait]
pub trait BoostServiceApi: Send + Sync {
    /// Open a payment for boosting one of the caller's spliks
    async fn create_payment(
        &self,
        session: &Session,
        splik_id: Uuid,
        level: &str,
    ) -> Result<PaymentIntentResponse, BoostServiceError>;

    /// Activate the boost paid for by `intent_id`. Each intent activates at most once.
    async fn confirm_payment(
        &self,
        session: &Session,
        intent_id: &str,
        splik_id: Uuid,
        level: &str,
    ) -> Result<ConfirmPaymentResponse, BoostServiceError>;

    async fn expire_boosts(&self, now: DateTime<Utc>) -> Result<u64, BoostServiceError>;
}

#[async_trait]
impl BoostServiceApi for BoostService {
    async fn create_payment(
        &self,
        session: &Session,
        splik_id: Uuid,
        level: &str,
    ) -> Result<PaymentIntentResponse, BoostServiceError> {
        let user = session.require_user("boost spliks")?;
        let level = Self::parse_level(level)?;

        let splik = self
            .splik_repo
            .find_by_id(splik_id)
            .await?
            .ok_or(BoostServiceError::NotFound)?;
        if splik.user_id != user.user_id {
            return Err(BoostServiceError::Forbidden(
                "You can only boost your own spliks".to_string(),
            ));
        }

        let metadata = BoostMetadata {
            user_id: user.user_id,
            splik_id,
            level,
        };
        let intent = self
            .payments
            .create_intent(level.price_cents(), &metadata)
            .await?;

        tracing::info!(
            payment_intent_id = %intent.id,
            splik_id = %splik_id,
            level = %level,
            amount = intent.amount,
            "Payment intent created"
        );

        Ok(PaymentIntentResponse {
            client_secret: intent.client_secret,
            amount: level.price_cents(),
            payment_intent_id: intent.id,
        })
    }

    async fn confirm_payment(
        &self,
        session: &Session,
        intent_id: &str,
        splik_id: Uuid,
        level: &str,
    ) -> Result<ConfirmPaymentResponse, BoostServiceError> {
        let user = session.require_user("boost spliks")?;
        let level = Self::parse_level(level)?;
        if intent_id.trim().is_empty() {
            return Err(BoostServiceError::Invalid(
                "Payment intent id is required".to_string(),
            ));
        }

        let intent = self.payments.retrieve_intent(intent_id).await?;
        if intent.status != INTENT_STATUS_SUCCEEDED {
            tracing::warn!(
                payment_intent_id = %intent_id,
                status = %intent.status,
                "Boost confirmation for unpaid intent"
            );
            return Err(BoostServiceError::PaymentRequired(
                "Payment not successful".to_string(),
            ));
        }

        let expected = BoostMetadata {
            user_id: user.user_id,
            splik_id,
            level,
        };
        if !expected.matches(&intent.metadata) {
            return Err(BoostServiceError::Invalid(
                "Payment does not match this boost".to_string(),
            ));
        }

        if self
            .boost_repo
            .find_by_payment_intent(intent_id)
            .await?
            .is_some()
        {
            return Err(BoostServiceError::AlreadyConfirmed);
        }

        let start_date = Utc::now();
        let boost = self
            .boost_repo
            .activate(NewBoost {
                splik_id,
                user_id: user.user_id,
                level,
                amount: intent.amount,
                start_date,
                end_date: start_date + Duration::days(level.duration_days()),
                payment_intent_id: intent.id,
            })
            .await?;

        tracing::info!(boost_id = %boost.id, splik_id = %splik_id, level = %level, "Boost activated");

        Ok(ConfirmPaymentResponse {
            success: true,
            boost,
            message: format!(
                "Your video is now boosted for {} days!",
                level.duration_days()
            ),
        })
    }

    async fn expire_boosts(&self, now: DateTime<Utc>) -> Result<u64, BoostServiceError> {
        let expired = self.boost_repo.expire_old_boosts(now).await?;
        if expired > 0 {
            tracing::info!(expired, "Expired boosts");
        }
        Ok(expired)
    }
}

/// Expire ended boosts every `every`, starting immediately
pub fn spawn_expiry_task(service: Arc<BoostService>, every: std::time::Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = service.expire_boosts(Utc::now()).await {
                tracing::error!(error = %e, "Boost expiry run failed");
            }
        }
    })
}
