use crate::e2e::helpers;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use helpers::{generate_test_jwt, TestContext};
use pretty_assertions::assert_eq;
use serde_json::json;
use splikz_backend::domain::boost::{
    BoostLevel, BoostRepository, NewBoost, PaymentIntent, BOOST_STATUS_EXPIRED,
};
use splikz_backend::error::AppError;
use splikz_backend::infrastructure::repositories::PgBoostRepository;
use std::collections::HashMap;
use std::sync::Arc;
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_create_a_payment_intent_priced_by_level(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();
    let token = generate_test_jwt(&creator.id);

    let response = ctx
        .client
        .post_with_auth(
            "/api/boosts/payment-intents",
            &json!({ "splikId": splik.id, "boostLevel": "premium" }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.value();
    assert_eq!(body["amount"], 1500);
    assert_eq!(body["paymentIntentId"], "pi_test_0");
    assert_eq!(body["clientSecret"], "pi_test_0_secret");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_unknown_boost_levels(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/boosts/payment-intents",
            &json!({ "splikId": splik.id, "boostLevel": "mega" }),
            &generate_test_jwt(&creator.id),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Invalid boost level: mega");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_only_let_owners_boost_a_splik(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let stranger = ctx.fixtures.create_profile("stranger").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/boosts/payment-intents",
            &json!({ "splikId": splik.id, "boostLevel": "standard" }),
            &generate_test_jwt(&stranger.id),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("You can only boost your own spliks");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_activate_a_boost_once_the_payment_succeeds(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();
    let token = generate_test_jwt(&creator.id);

    let intent = ctx
        .client
        .post_with_auth(
            "/api/boosts/payment-intents",
            &json!({ "splikId": splik.id, "boostLevel": "max" }),
            &token,
        )
        .await
        .unwrap();
    let intent_id = intent.value()["paymentIntentId"].as_str().unwrap().to_string();
    let confirm = json!({
        "paymentIntentId": intent_id,
        "splikId": splik.id,
        "boostLevel": "max",
    });

    // Not paid yet
    let response = ctx
        .client
        .post_with_auth("/api/boosts/confirm", &confirm, &token)
        .await
        .unwrap();
    response
        .assert_status(StatusCode::PAYMENT_REQUIRED)
        .assert_error_message("Payment not successful");

    ctx.payments.mark_succeeded(&intent_id);
    let response = ctx
        .client
        .post_with_auth("/api/boosts/confirm", &confirm, &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.value();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Your video is now boosted for 30 days!");
    assert_eq!(body["boost"]["boost_level"], "max");
    assert_eq!(body["boost"]["amount"], 3000);
    assert_eq!(body["boost"]["status"], "active");

    let boosted = ctx.fixtures.get_splik(splik.id).await.unwrap();
    assert_eq!(boosted.boost_score, 1000);
    assert!(boosted.is_currently_boosted);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_reuse_a_payment_for_a_second_boost(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();
    let token = generate_test_jwt(&creator.id);

    let intent = ctx
        .client
        .post_with_auth(
            "/api/boosts/payment-intents",
            &json!({ "splikId": splik.id, "boostLevel": "standard" }),
            &token,
        )
        .await
        .unwrap();
    let intent_id = intent.value()["paymentIntentId"].as_str().unwrap().to_string();
    ctx.payments.mark_succeeded(&intent_id);
    let confirm = json!({
        "paymentIntentId": intent_id,
        "splikId": splik.id,
        "boostLevel": "standard",
    });

    ctx.client
        .post_with_auth("/api/boosts/confirm", &confirm, &token)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    let response = ctx
        .client
        .post_with_auth("/api/boosts/confirm", &confirm, &token)
        .await
        .unwrap();

    response
        .assert_status(StatusCode::CONFLICT)
        .assert_error_message("This payment has already been used");
    assert_eq!(ctx.fixtures.get_boosts(splik.id).await.unwrap().len(), 1);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_a_payment_made_for_a_different_boost(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();
    let token = generate_test_jwt(&creator.id);

    // A cheap intent must not unlock an expensive level
    ctx.payments.insert(PaymentIntent {
        id: "pi_cheap".to_string(),
        client_secret: None,
        amount: 500,
        currency: "usd".to_string(),
        status: "succeeded".to_string(),
        metadata: HashMap::from([
            ("userId".to_string(), creator.id.to_string()),
            ("splikId".to_string(), splik.id.to_string()),
            ("boostLevel".to_string(), "standard".to_string()),
        ]),
    });

    let response = ctx
        .client
        .post_with_auth(
            "/api/boosts/confirm",
            &json!({
                "paymentIntentId": "pi_cheap",
                "splikId": splik.id,
                "boostLevel": "max",
            }),
            &token,
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Payment does not match this boost");
    assert!(ctx.fixtures.get_boosts(splik.id).await.unwrap().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_when_boosting_a_missing_splik(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();

    let response = ctx
        .client
        .post_with_auth(
            "/api/boosts/payment-intents",
            &json!({ "splikId": Uuid::new_v4(), "boostLevel": "standard" }),
            &generate_test_jwt(&creator.id),
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::NOT_FOUND);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refuse_a_second_boost_row_for_the_same_payment(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();
    let repo = PgBoostRepository::new(Arc::new(ctx.pool.clone()));
    let now = Utc::now();
    let boost = NewBoost {
        splik_id: splik.id,
        user_id: creator.id,
        level: BoostLevel::Premium,
        amount: BoostLevel::Premium.price_cents(),
        start_date: now,
        end_date: now + Duration::days(BoostLevel::Premium.duration_days()),
        payment_intent_id: "pi_raced".to_string(),
    };

    repo.activate(boost.clone()).await.unwrap();
    let err = repo.activate(boost).await.unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(ctx.fixtures.get_boosts(splik.id).await.unwrap().len(), 1);
    let stored = ctx.fixtures.get_splik(splik.id).await.unwrap();
    assert_eq!(stored.boost_score, BoostLevel::Premium.boost_score());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_expire_ended_boosts_and_reset_the_splik(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let ended = ctx
        .fixtures
        .create_boosted_splik(creator.id, "ended", BoostLevel::Max, Duration::hours(-1))
        .await
        .unwrap();
    let running = ctx
        .fixtures
        .create_boosted_splik(creator.id, "running", BoostLevel::Standard, Duration::days(2))
        .await
        .unwrap();
    let repo = PgBoostRepository::new(Arc::new(ctx.pool.clone()));

    assert_eq!(repo.expire_old_boosts(Utc::now()).await.unwrap(), 1);

    let boosts = ctx.fixtures.get_boosts(ended.id).await.unwrap();
    assert_eq!(boosts[0].status, BOOST_STATUS_EXPIRED);
    let stored = ctx.fixtures.get_splik(ended.id).await.unwrap();
    assert_eq!(stored.boost_score, 0);
    assert!(!stored.is_currently_boosted);

    let stored = ctx.fixtures.get_splik(running.id).await.unwrap();
    assert_eq!(stored.boost_score, BoostLevel::Standard.boost_score());
    assert!(stored.is_currently_boosted);

    // Nothing left to expire
    assert_eq!(repo.expire_old_boosts(Utc::now()).await.unwrap(), 0);
}
