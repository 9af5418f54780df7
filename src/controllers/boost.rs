use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    domain::{
        auth::Session,
        boost::{
            BoostService, BoostServiceApi, ConfirmPaymentRequest, ConfirmPaymentResponse,
            CreatePaymentRequest, PaymentIntentResponse,
        },
    },
    error::AppResult,
};

pub struct BoostController {
    boost_service: Arc<BoostService>,
}

impl BoostController {
    pub fn new(boost_service: Arc<BoostService>) -> Self {
        Self { boost_service }
    }

    /// POST /api/boosts/payment-intents - Start paying for a boost
    pub async fn create_payment_intent(
        State(controller): State<Arc<BoostController>>,
        Extension(session): Extension<Session>,
        Json(request): Json<CreatePaymentRequest>,
    ) -> AppResult<Json<PaymentIntentResponse>> {
        let intent = controller
            .boost_service
            .create_payment(&session, request.splik_id, &request.boost_level)
            .await?;
        Ok(Json(intent))
    }

    /// POST /api/boosts/confirm - Activate a paid boost
    pub async fn confirm(
        State(controller): State<Arc<BoostController>>,
        Extension(session): Extension<Session>,
        Json(request): Json<ConfirmPaymentRequest>,
    ) -> AppResult<Json<ConfirmPaymentResponse>> {
        let confirmed = controller
            .boost_service
            .confirm_payment(
                &session,
                &request.payment_intent_id,
                request.splik_id,
                &request.boost_level,
            )
            .await?;
        Ok(Json(confirmed))
    }
}
