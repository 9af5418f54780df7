pub mod error;
pub mod service;
pub mod tiers;

pub use error::BoostServiceError;
pub use service::{spawn_expiry_task, BoostService, BoostServiceApi};
pub use tiers::{BoostLevel, UnknownBoostLevel};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::HashMap;
use uuid::Uuid;

use crate::error::AppResult;

pub const BOOST_STATUS_ACTIVE: &str = "active";
pub const BOOST_STATUS_EXPIRED: &str = "expired";
pub const INTENT_STATUS_SUCCEEDED: &str = "succeeded";

/// A paid promotion of one splik
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Boost {
    pub id: Uuid,
    pub splik_id: Uuid,
    pub user_id: Uuid,
    pub boost_level: String,
    /// Amount charged, in cents
    pub amount: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub status: String,
    pub stripe_payment_intent_id: String,
    pub impressions_gained: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewBoost {
    pub splik_id: Uuid,
    pub user_id: Uuid,
    pub level: BoostLevel,
    pub amount: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub payment_intent_id: String,
}

/// Payment intent as reported by the payment processor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    #[serde(default)]
    pub client_secret: Option<String>,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

/// What a payment intent is for, stored on the intent itself
#[derive(Debug, Clone, PartialEq)]
pub struct BoostMetadata {
    pub user_id: Uuid,
    pub splik_id: Uuid,
    pub level: BoostLevel,
}

impl BoostMetadata {
    pub fn to_map(&self) -> HashMap<String, String> {
        HashMap::from([
            ("userId".to_string(), self.user_id.to_string()),
            ("splikId".to_string(), self.splik_id.to_string()),
            ("boostLevel".to_string(), self.level.to_string()),
        ])
    }

    /// Whether the intent was created for exactly this purchase
    pub fn matches(&self, metadata: &HashMap<String, String>) -> bool {
        metadata.get("userId") == Some(&self.user_id.to_string())
            && metadata.get("splikId") == Some(&self.splik_id.to_string())
            && metadata.get("boostLevel").map(String::as_str) == Some(self.level.as_str())
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_intent(
        &self,
        amount_cents: i64,
        metadata: &BoostMetadata,
    ) -> AppResult<PaymentIntent>;

    async fn retrieve_intent(&self, intent_id: &str) -> AppResult<PaymentIntent>;
}

#[async_trait]
pub trait BoostRepository: Send + Sync {
    /// Store the boost and raise the splik's score in one step.
    /// A payment intent can only ever back one boost.
    async fn activate(&self, boost: NewBoost) -> AppResult<Boost>;

    async fn find_by_payment_intent(&self, intent_id: &str) -> AppResult<Option<Boost>>;

    /// Mark boosts ended by `now` as expired and drop the score of spliks
    /// left without a running boost. Returns how many boosts expired.
    async fn expire_old_boosts(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub splik_id: Uuid,
    pub boost_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: Option<String>,
    pub amount: i64,
    pub payment_intent_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    pub payment_intent_id: String,
    pub splik_id: Uuid,
    pub boost_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmPaymentResponse {
    pub success: bool,
    pub boost: Boost,
    pub message: String,
}
