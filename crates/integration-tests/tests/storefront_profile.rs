//! Integration tests for the profile query and sparse update.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed data applied
//! - The storefront server running (cargo run -p clementine-storefront)
//!
//! Run with: cargo test -p clementine-integration-tests -- --ignored

use clementine_integration_tests::TestContext;
use serde_json::json;

const GET_PROFILE: &str = r"
query {
    getUserProfileDetails { id email firstName lastName phone }
}";

const UPDATE_PROFILE: &str = r"
mutation($input: UpdateProfileInput!) {
    updateUserProfileDetails(input: $input) { success code message }
}";

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn profile_round_trips_a_sparse_update() {
    let ctx = TestContext::authenticated();

    let result = ctx
        .mutate(
            UPDATE_PROFILE,
            json!({ "input": { "firstName": "  Ada  ", "lastName": "Lovelace" } }),
            "updateUserProfileDetails",
        )
        .await;
    assert_eq!(result["success"], true, "update failed: {result}");

    let body = ctx.graphql(GET_PROFILE, json!(null)).await;
    let profile = &body["data"]["getUserProfileDetails"];
    assert_eq!(profile["firstName"], "Ada");
    assert_eq!(profile["lastName"], "Lovelace");

    // Patch only the phone; names must survive.
    let result = ctx
        .mutate(
            UPDATE_PROFILE,
            json!({ "input": { "phone": "+1 555 0100" } }),
            "updateUserProfileDetails",
        )
        .await;
    assert_eq!(result["success"], true);

    let body = ctx.graphql(GET_PROFILE, json!(null)).await;
    let profile = &body["data"]["getUserProfileDetails"];
    assert_eq!(profile["firstName"], "Ada");
    assert_eq!(profile["phone"], "+1 555 0100");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn empty_profile_patch_is_rejected() {
    let ctx = TestContext::authenticated();

    let result = ctx
        .mutate(
            UPDATE_PROFILE,
            json!({ "input": {} }),
            "updateUserProfileDetails",
        )
        .await;
    assert_eq!(result["success"], false);
    assert_eq!(result["code"], "INVALID_INPUT");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn profile_query_returns_the_token_user() {
    let ctx = TestContext::for_user(1);

    let body = ctx.graphql(GET_PROFILE, json!(null)).await;
    assert_eq!(body["data"]["getUserProfileDetails"]["id"], 1);
}
