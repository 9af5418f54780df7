use crate::e2e::helpers;

use axum::http::StatusCode;
use helpers::{generate_test_jwt, TestContext};
use pretty_assertions::assert_eq;
use serde_json::json;
use splikz_backend::domain::realtime::{RealtimeEvent, Topic};
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_like_and_unlike_a_splik(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let fan = ctx.fixtures.create_profile("fan").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();
    let token = generate_test_jwt(&fan.id);
    let path = format!("/api/spliks/{}/like", splik.id);

    let response = ctx.client.put_with_auth(&path, &token).await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.value(), &json!({ "active": true, "count": 1 }));

    let response = ctx.client.get_with_auth(&path, &token).await.unwrap();
    assert_eq!(response.value(), &json!({ "active": true, "count": 1 }));

    let response = ctx.client.delete_with_auth(&path, &token).await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.value(), &json!({ "active": false, "count": 0 }));
    assert_eq!(ctx.fixtures.get_splik(splik.id).await.unwrap().likes_count, 0);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_treat_repeated_likes_as_a_no_op(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let fan = ctx.fixtures.create_profile("fan").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();
    let token = generate_test_jwt(&fan.id);
    let path = format!("/api/spliks/{}/like", splik.id);

    ctx.client.put_with_auth(&path, &token).await.unwrap();
    let response = ctx.client.put_with_auth(&path, &token).await.unwrap();

    assert_eq!(response.value(), &json!({ "active": true, "count": 1 }));

    ctx.client.delete_with_auth(&path, &token).await.unwrap();
    let response = ctx.client.delete_with_auth(&path, &token).await.unwrap();
    assert_eq!(response.value(), &json!({ "active": false, "count": 0 }));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_report_inactive_status_to_anonymous_callers(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let fan = ctx.fixtures.create_profile("fan").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();
    let path = format!("/api/spliks/{}/like", splik.id);
    ctx.client
        .put_with_auth(&path, &generate_test_jwt(&fan.id))
        .await
        .unwrap();

    let response = ctx.client.get(&path).await.unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.value(), &json!({ "active": false, "count": 1 }));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_unknown_targets(ctx: &TestContext) {
    let fan = ctx.fixtures.create_profile("fan").await.unwrap();
    let token = generate_test_jwt(&fan.id);

    let response = ctx
        .client
        .put_with_auth(&format!("/api/spliks/{}/like", Uuid::new_v4()), &token)
        .await
        .unwrap();
    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Splik not found");

    let response = ctx
        .client
        .put_with_auth(&format!("/api/profiles/{}/follow", Uuid::new_v4()), &token)
        .await
        .unwrap();
    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Profile not found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_broadcast_like_counts_to_splik_watchers(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let fan = ctx.fixtures.create_profile("fan").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();
    let mut watcher = ctx.hub.subscribe(Topic::Splik(splik.id));

    ctx.client
        .put_with_auth(
            &format!("/api/spliks/{}/like", splik.id),
            &generate_test_jwt(&fan.id),
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let event = watcher.next().await.unwrap();
    assert_eq!(
        event,
        RealtimeEvent::SplikUpdated {
            splik_id: splik.id,
            views: 0,
            likes_count: 1,
            comments_count: 0,
        }
    );
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_follow_a_creator_and_update_both_counters(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let fan = ctx.fixtures.create_profile("fan").await.unwrap();
    let token = generate_test_jwt(&fan.id);
    let mut watcher = ctx.hub.subscribe(Topic::Profile(creator.id));

    let response = ctx
        .client
        .put_with_auth(&format!("/api/profiles/{}/follow", creator.id), &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.value(), &json!({ "active": true, "count": 1 }));
    let stored_fan = ctx.fixtures.get_profile(fan.id).await.unwrap();
    assert_eq!(stored_fan.following_count, Some(1));
    assert_eq!(
        watcher.next().await.unwrap(),
        RealtimeEvent::FollowersChanged {
            profile_id: creator.id,
            followers_count: 1,
        }
    );

    let response = ctx
        .client
        .get(&format!("/api/profiles/{}/followers", creator.id))
        .await
        .unwrap();
    let followers: Vec<&str> = response
        .value()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["username"].as_str().unwrap())
        .collect();
    assert_eq!(followers, vec!["fan"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_ask_users_without_a_profile_to_create_one(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let splik = ctx.fixtures.create_splik(creator.id, "clip").await.unwrap();
    let token = generate_test_jwt(&Uuid::new_v4());

    let response = ctx
        .client
        .put_with_auth(&format!("/api/spliks/{}/like", splik.id), &token)
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Create a profile to like spliks");

    let response = ctx
        .client
        .put_with_auth(&format!("/api/profiles/{}/follow", creator.id), &token)
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Create a profile to follow creators");

    assert_eq!(ctx.fixtures.get_splik(splik.id).await.unwrap().likes_count, 0);
    let stored = ctx.fixtures.get_profile(creator.id).await.unwrap();
    assert_eq!(stored.followers_count, Some(0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_not_allow_following_yourself(ctx: &TestContext) {
    let me = ctx.fixtures.create_profile("me").await.unwrap();

    let response = ctx
        .client
        .put_with_auth(
            &format!("/api/profiles/{}/follow", me.id),
            &generate_test_jwt(&me.id),
        )
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("You cannot follow yourself");
    let stored = ctx.fixtures.get_profile(me.id).await.unwrap();
    assert_eq!(stored.followers_count, Some(0));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_favorites_most_recent_first(ctx: &TestContext) {
    let creator = ctx.fixtures.create_profile("creator").await.unwrap();
    let fan = ctx.fixtures.create_profile("fan").await.unwrap();
    let first = ctx.fixtures.create_splik(creator.id, "first").await.unwrap();
    let second = ctx.fixtures.create_splik(creator.id, "second").await.unwrap();
    let skipped = ctx.fixtures.create_splik(creator.id, "skipped").await.unwrap();
    let token = generate_test_jwt(&fan.id);

    for splik in [&second, &first] {
        ctx.client
            .put_with_auth(&format!("/api/spliks/{}/favorite", splik.id), &token)
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    let response = ctx
        .client
        .get_with_auth("/api/me/favorites", &token)
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let ids: Vec<&str> = response
        .value()
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["id"].as_str().unwrap())
        .collect();
    let expected = vec![first.id.to_string(), second.id.to_string()];
    assert_eq!(ids, expected);
    assert!(!ids.contains(&skipped.id.to_string().as_str()));
}
