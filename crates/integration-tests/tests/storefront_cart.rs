//! Integration tests for the cart mutations and query.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed data applied
//! - The storefront server running (cargo run -p clementine-storefront)
//! - `STOREFRONT_JWT_SECRET` matching the running server
//!
//! Run with: cargo test -p clementine-integration-tests -- --ignored

use clementine_integration_tests::{TestContext, variant_id_by_sku};
use serde_json::json;

const ADD_TO_CART: &str = r"
mutation($variantId: VariantId!, $quantity: Int!) {
    addToCart(variantId: $variantId, quantity: $quantity) { success code message }
}";

const UPDATE_CART_QUANTITY: &str = r"
mutation($variantId: VariantId!, $quantity: Int!) {
    updateCartQuantity(variantId: $variantId, quantity: $quantity) { success code message }
}";

const REMOVE_FROM_CART: &str = r"
mutation($variantId: VariantId!) {
    removeFromCart(variantId: $variantId) { success code message }
}";

const CLEAR_CART: &str = r"
mutation { clearCart { success code message } }";

const GET_MY_CART: &str = r"
query {
    getMyCart {
        items { variantId quantity lineTotal }
        subtotal
        totalQuantity
    }
}";

async fn quantity_of(ctx: &TestContext, variant_id: i32) -> i64 {
    let body = ctx.graphql(GET_MY_CART, json!(null)).await;
    body["data"]["getMyCart"]["items"]
        .as_array()
        .expect("items should be an array")
        .iter()
        .find(|item| item["variantId"] == variant_id)
        .and_then(|item| item["quantity"].as_i64())
        .unwrap_or(0)
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn add_then_add_sums_then_zero_empties() {
    let ctx = TestContext::authenticated();
    let variant = variant_id_by_sku("SHIRT-S").await;

    let result = ctx
        .mutate(CLEAR_CART, json!(null), "clearCart")
        .await;
    assert_eq!(result["success"], true);

    // add 3
    let result = ctx
        .mutate(
            ADD_TO_CART,
            json!({ "variantId": variant, "quantity": 3 }),
            "addToCart",
        )
        .await;
    assert_eq!(result["success"], true, "first add failed: {result}");
    assert_eq!(quantity_of(&ctx, variant).await, 3);

    // add 2 more -> 5
    let result = ctx
        .mutate(
            ADD_TO_CART,
            json!({ "variantId": variant, "quantity": 2 }),
            "addToCart",
        )
        .await;
    assert_eq!(result["success"], true);
    assert_eq!(quantity_of(&ctx, variant).await, 5);

    // set to 0 -> line gone
    let result = ctx
        .mutate(
            UPDATE_CART_QUANTITY,
            json!({ "variantId": variant, "quantity": 0 }),
            "updateCartQuantity",
        )
        .await;
    assert_eq!(result["success"], true);
    assert_eq!(quantity_of(&ctx, variant).await, 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn invalid_quantity_is_rejected_without_changes() {
    let ctx = TestContext::authenticated();
    let variant = variant_id_by_sku("SHIRT-M").await;

    ctx.mutate(CLEAR_CART, json!(null), "clearCart").await;

    let result = ctx
        .mutate(
            ADD_TO_CART,
            json!({ "variantId": variant, "quantity": 0 }),
            "addToCart",
        )
        .await;
    assert_eq!(result["success"], false);
    assert_eq!(result["code"], "INVALID_QUANTITY");
    assert_eq!(quantity_of(&ctx, variant).await, 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn adding_beyond_stock_fails_out_of_stock() {
    let ctx = TestContext::authenticated();
    // SHIRT-L is seeded with zero stock.
    let variant = variant_id_by_sku("SHIRT-L").await;

    let result = ctx
        .mutate(
            ADD_TO_CART,
            json!({ "variantId": variant, "quantity": 1 }),
            "addToCart",
        )
        .await;
    assert_eq!(result["success"], false);
    assert_eq!(result["code"], "OUT_OF_STOCK");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn untracked_stock_never_runs_out() {
    let ctx = TestContext::authenticated();
    let variant = variant_id_by_sku("TOTE-STD").await;

    ctx.mutate(CLEAR_CART, json!(null), "clearCart").await;

    let result = ctx
        .mutate(
            ADD_TO_CART,
            json!({ "variantId": variant, "quantity": 500 }),
            "addToCart",
        )
        .await;
    assert_eq!(result["success"], true, "untracked add failed: {result}");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn inactive_product_cannot_be_added() {
    let ctx = TestContext::authenticated();
    // JACKET-PROTO belongs to a DRAFT product.
    let variant = variant_id_by_sku("JACKET-PROTO").await;

    let result = ctx
        .mutate(
            ADD_TO_CART,
            json!({ "variantId": variant, "quantity": 1 }),
            "addToCart",
        )
        .await;
    assert_eq!(result["success"], false);
    assert_eq!(result["code"], "PRODUCT_INACTIVE");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn removing_an_absent_line_reports_not_in_cart() {
    let ctx = TestContext::authenticated();
    let variant = variant_id_by_sku("SHIRT-M").await;

    ctx.mutate(CLEAR_CART, json!(null), "clearCart").await;

    let result = ctx
        .mutate(
            REMOVE_FROM_CART,
            json!({ "variantId": variant }),
            "removeFromCart",
        )
        .await;
    assert_eq!(result["success"], false);
    assert_eq!(result["code"], "NOT_IN_CART");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn clear_cart_succeeds_when_already_empty() {
    let ctx = TestContext::authenticated();

    ctx.mutate(CLEAR_CART, json!(null), "clearCart").await;
    let result = ctx.mutate(CLEAR_CART, json!(null), "clearCart").await;
    assert_eq!(result["success"], true);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn unauthenticated_mutations_report_code_not_transport_error() {
    let ctx = TestContext::anonymous();
    let variant = variant_id_by_sku("SHIRT-S").await;

    let result = ctx
        .mutate(
            ADD_TO_CART,
            json!({ "variantId": variant, "quantity": 1 }),
            "addToCart",
        )
        .await;
    assert_eq!(result["success"], false);
    assert_eq!(result["code"], "UNAUTHENTICATED");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn unauthenticated_query_errors_with_code_extension() {
    let ctx = TestContext::anonymous();

    let body = ctx.graphql(GET_MY_CART, json!(null)).await;
    let errors = body["errors"].as_array().expect("query should error");
    assert_eq!(errors[0]["extensions"]["code"], "UNAUTHENTICATED");
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn concurrent_first_adds_cannot_exceed_stock() {
    let ctx = TestContext::authenticated();
    let other = TestContext::authenticated();
    // SHIRT-M has 10 in stock; two adds of 7 cannot both fit.
    let variant = variant_id_by_sku("SHIRT-M").await;

    ctx.mutate(CLEAR_CART, json!(null), "clearCart").await;

    let vars = json!({ "variantId": variant, "quantity": 7 });
    let (first, second) = tokio::join!(
        ctx.mutate(ADD_TO_CART, vars.clone(), "addToCart"),
        other.mutate(ADD_TO_CART, vars, "addToCart"),
    );

    let successes = [&first, &second]
        .iter()
        .filter(|result| result["success"] == true)
        .count();
    assert_eq!(successes, 1, "got {first} and {second}");

    let loser = if first["success"] == true {
        &second
    } else {
        &first
    };
    assert_eq!(loser["code"], "OUT_OF_STOCK");
    assert_eq!(quantity_of(&ctx, variant).await, 7);

    ctx.mutate(CLEAR_CART, json!(null), "clearCart").await;
}
