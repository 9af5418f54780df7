use crate::e2e::helpers;

use axum::http::StatusCode;
use helpers::{generate_test_jwt, TestContext};
use pretty_assertions::assert_eq;
use serde_json::json;
use splikz_backend::domain::profile::ProfileRow;
use test_context::test_context;
use uuid::Uuid;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_a_normalized_profile(ctx: &TestContext) {
    let id = Uuid::new_v4();
    ctx.fixtures
        .insert_profile(&ProfileRow {
            id,
            handle: Some("legacy_handle".to_string()),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            display_name: Some("   ".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let response = ctx
        .client
        .get(&format!("/api/profiles/{}", id))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let body = response.value();
    assert_eq!(body["display_name"], "Ada Lovelace");
    assert_eq!(body["username"], "legacy_handle");
    assert_eq!(body["slug"], "legacy_handle");
    assert_eq!(body["followers_count"], 0);
    assert_eq!(body["is_private"], false);
    assert_eq!(body["followers_private"], false);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_not_found_for_unknown_profiles(ctx: &TestContext) {
    let response = ctx
        .client
        .get(&format!("/api/profiles/{}", Uuid::new_v4()))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Profile not found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_list_who_a_profile_follows(ctx: &TestContext) {
    let fan = ctx.fixtures.create_profile("fan").await.unwrap();
    let first = ctx.fixtures.create_profile("first").await.unwrap();
    let second = ctx.fixtures.create_profile("second").await.unwrap();
    let token = generate_test_jwt(&fan.id);

    // Loaded once before following, so a stale cached copy would show 0
    let response = ctx
        .client
        .get(&format!("/api/profiles/{}", fan.id))
        .await
        .unwrap();
    assert_eq!(response.value()["following_count"], 0);

    for creator in [&first, &second] {
        ctx.client
            .put_with_auth(&format!("/api/profiles/{}/follow", creator.id), &token)
            .await
            .unwrap()
            .assert_status(StatusCode::OK);
    }

    let response = ctx
        .client
        .get(&format!("/api/profiles/{}/following", fan.id))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    let usernames: Vec<&str> = response
        .value()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["username"].as_str().unwrap())
        .collect();
    assert_eq!(usernames, vec!["second", "first"]);

    let response = ctx
        .client
        .get(&format!("/api/profiles/{}", fan.id))
        .await
        .unwrap();
    assert_eq!(response.value()["following_count"], 2);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_update_the_callers_profile(ctx: &TestContext) {
    let me = ctx.fixtures.create_profile("old_name").await.unwrap();
    let token = generate_test_jwt(&me.id);

    ctx.client
        .get(&format!("/api/profiles/{}", me.id))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let response = ctx
        .client
        .patch_with_auth(
            "/api/me/profile",
            &json!({
                "username": "@new.name",
                "display_name": "New Name",
                "bio": "  short films  "
            }),
            &token,
        )
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);
    assert_eq!(response.value()["username"], "new.name");
    assert_eq!(response.value()["slug"], "new.name");
    assert_eq!(response.value()["bio"], "short films");

    let stored = ctx.fixtures.get_profile(me.id).await.unwrap();
    assert_eq!(stored.username.as_deref(), Some("new.name"));
    assert_eq!(stored.display_name.as_deref(), Some("New Name"));

    let response = ctx
        .client
        .get(&format!("/api/profiles/{}", me.id))
        .await
        .unwrap();
    assert_eq!(response.value()["display_name"], "New Name");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_refuse_a_username_that_is_taken(ctx: &TestContext) {
    ctx.fixtures.create_profile("taken").await.unwrap();
    let me = ctx.fixtures.create_profile("mine").await.unwrap();
    let token = generate_test_jwt(&me.id);

    let response = ctx
        .client
        .patch_with_auth("/api/me/profile", &json!({ "username": "taken" }), &token)
        .await
        .unwrap();

    response
        .assert_status(StatusCode::CONFLICT)
        .assert_error_message("Username already taken");
    let stored = ctx.fixtures.get_profile(me.id).await.unwrap();
    assert_eq!(stored.username.as_deref(), Some("mine"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_validate_profile_edits(ctx: &TestContext) {
    let me = ctx.fixtures.create_profile("mine").await.unwrap();
    let token = generate_test_jwt(&me.id);

    let response = ctx
        .client
        .patch_with_auth("/api/me/profile", &json!({ "username": "no spaces" }), &token)
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Username can only contain");

    let response = ctx
        .client
        .patch_with_auth("/api/me/profile", &json!({}), &token)
        .await
        .unwrap();
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("Nothing to update");

    let stranger = generate_test_jwt(&Uuid::new_v4());
    let response = ctx
        .client
        .patch_with_auth("/api/me/profile", &json!({ "bio": "hi" }), &stranger)
        .await
        .unwrap();
    response
        .assert_status(StatusCode::NOT_FOUND)
        .assert_error_message("Profile not found");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_hide_private_follower_lists_from_others(ctx: &TestContext) {
    let owner = ctx.fixtures.create_profile("owner").await.unwrap();
    let fan = ctx.fixtures.create_profile("fan").await.unwrap();
    let owner_token = generate_test_jwt(&owner.id);
    let fan_token = generate_test_jwt(&fan.id);

    ctx.client
        .put_with_auth(&format!("/api/profiles/{}/follow", owner.id), &fan_token)
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    ctx.client
        .patch_with_auth(
            "/api/me/profile",
            &json!({ "followers_private": true }),
            &owner_token,
        )
        .await
        .unwrap()
        .assert_status(StatusCode::OK);

    let path = format!("/api/profiles/{}/followers", owner.id);
    ctx.client
        .get(&path)
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN)
        .assert_error_message("This list is private");
    ctx.client
        .get_with_auth(&path, &fan_token)
        .await
        .unwrap()
        .assert_status(StatusCode::FORBIDDEN);

    let response = ctx.client.get_with_auth(&path, &owner_token).await.unwrap();
    response.assert_status(StatusCode::OK);
    assert_eq!(response.value()[0]["username"], "fan");

    // Only the followers list was made private
    ctx.client
        .get(&format!("/api/profiles/{}/following", owner.id))
        .await
        .unwrap()
        .assert_status(StatusCode::OK);
    let response = ctx
        .client
        .get(&format!("/api/profiles/{}", owner.id))
        .await
        .unwrap();
    assert_eq!(response.value()["followers_count"], 1);
}
