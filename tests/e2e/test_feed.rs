use crate::e2e::helpers;

use axum::http::StatusCode;
use chrono::Duration;
use helpers::{generate_test_jwt, TestContext};
use pretty_assertions::assert_eq;
use serde_json::Value;
use splikz_backend::domain::boost::BoostLevel;
use test_context::test_context;
use uuid::Uuid;

fn titles(items: &[Value]) -> Vec<&str> {
    items
        .iter()
        .map(|item| item.get("title").and_then(|v| v.as_str()).unwrap_or(""))
        .collect()
}

/// Impressions are recorded in the background; poll until one lands
async fn wait_for_impressions(ctx: &TestContext, splik_id: Uuid) -> Vec<i64> {
    let mut gained = Vec::new();
    for _ in 0..50 {
        gained = ctx
            .fixtures
            .get_boosts(splik_id)
            .await
            .unwrap()
            .iter()
            .map(|b| b.impressions_gained)
            .collect();
        if gained.iter().any(|n| *n > 0) {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    }
    gained
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_place_a_promoted_splik_after_every_third_organic_one(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    for n in 1..=6 {
        ctx.fixtures
            .create_splik(creator.id, &format!("organic-{}", n))
            .await
            .unwrap();
    }
    ctx.fixtures
        .create_boosted_splik(creator.id, "standard", BoostLevel::Standard, Duration::days(3))
        .await
        .unwrap();
    ctx.fixtures
        .create_boosted_splik(creator.id, "max", BoostLevel::Max, Duration::days(3))
        .await
        .unwrap();

    let response = ctx.client.get("/api/feed").await.unwrap();

    response.assert_status(StatusCode::OK);
    let items = response.value().as_array().unwrap().clone();
    assert_eq!(
        titles(&items),
        vec![
            "organic-6",
            "organic-5",
            "organic-4",
            "max",
            "organic-3",
            "organic-2",
            "organic-1",
            "standard",
        ]
    );

    let boosted: Vec<bool> = items
        .iter()
        .map(|item| item.get("is_boosted").and_then(|v| v.as_bool()).unwrap())
        .collect();
    assert_eq!(
        boosted,
        vec![false, false, false, true, false, false, false, true]
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_show_nothing_when_only_promoted_spliks_exist(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    ctx.fixtures
        .create_boosted_splik(creator.id, "lonely", BoostLevel::Premium, Duration::days(3))
        .await
        .unwrap();

    let response = ctx.client.get("/api/feed").await.unwrap();

    response.assert_status(StatusCode::OK);
    assert!(response.value().as_array().unwrap().is_empty());
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_leave_out_boosts_that_have_ended(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    for n in 1..=3 {
        ctx.fixtures
            .create_splik(creator.id, &format!("organic-{}", n))
            .await
            .unwrap();
    }
    ctx.fixtures
        .create_boosted_splik(creator.id, "ended", BoostLevel::Max, Duration::hours(-1))
        .await
        .unwrap();

    let response = ctx.client.get("/api/feed").await.unwrap();

    let items = response.value().as_array().unwrap().clone();
    assert_eq!(titles(&items), vec!["organic-3", "organic-2", "organic-1"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_attach_creator_profiles_to_feed_items(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("maker").await.unwrap();
    ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();
    let token = generate_test_jwt(&Uuid::new_v4());

    let response = ctx.client.get_with_auth("/api/feed", &token).await.unwrap();

    response.assert_status(StatusCode::OK);
    let item = &response.value()[0];
    assert_eq!(item["profile"]["username"], "maker");
    assert_eq!(item["profile"]["slug"], "maker");
    assert_eq!(item["profile"]["display_name"], "maker display");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_record_one_impression_per_placed_promoted_splik(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    for n in 1..=3 {
        ctx.fixtures
            .create_splik(creator.id, &format!("organic-{}", n))
            .await
            .unwrap();
    }
    let shown = ctx
        .fixtures
        .create_boosted_splik(creator.id, "shown", BoostLevel::Max, Duration::days(3))
        .await
        .unwrap();
    // Only three organic items, so a single promoted slot exists
    let unplaced = ctx
        .fixtures
        .create_boosted_splik(creator.id, "unplaced", BoostLevel::Standard, Duration::days(3))
        .await
        .unwrap();

    ctx.client
        .get("/api/feed")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    assert_eq!(wait_for_impressions(ctx, shown.id).await, vec![1]);
    let unplaced_boosts = ctx.fixtures.get_boosts(unplaced.id).await.unwrap();
    assert_eq!(unplaced_boosts[0].impressions_gained, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_credit_an_impression_to_the_newest_running_boost_only(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    for n in 1..=3 {
        ctx.fixtures
            .create_splik(creator.id, &format!("organic-{}", n))
            .await
            .unwrap();
    }
    let stacked = ctx
        .fixtures
        .create_boosted_splik(creator.id, "stacked", BoostLevel::Standard, Duration::days(1))
        .await
        .unwrap();
    ctx.fixtures
        .add_boost(&stacked, BoostLevel::Max, Duration::days(30))
        .await
        .unwrap();

    ctx.client
        .get("/api/feed")
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    // Oldest boost first
    assert_eq!(wait_for_impressions(ctx, stacked.id).await, vec![0, 1]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_latest_spliks_and_rising_creators_on_explore(ctx: &TestContext) {
    let mut creators = Vec::new();
    for n in 1..=8 {
        let creator = ctx
            .fixtures
            .create_profile(&format!("creator{}", n))
            .await
            .unwrap();
        creators.push(creator);
    }
    ctx.fixtures.create_splik(creators[0].id, "older").await.unwrap();
    ctx.fixtures
        .create_boosted_splik(creators[1].id, "boosted", BoostLevel::Premium, Duration::days(1))
        .await
        .unwrap();

    let response = ctx.client.get("/api/explore").await.unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.value();
    let trending = body["trending"].as_array().unwrap().clone();
    assert_eq!(titles(&trending), vec!["boosted", "older"]);
    assert_eq!(trending[0]["is_boosted"], true);

    let rising: Vec<&str> = body["rising_creators"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["username"].as_str().unwrap())
        .collect();
    assert_eq!(
        rising,
        vec!["creator8", "creator7", "creator6", "creator5", "creator4", "creator3"]
    );
}
