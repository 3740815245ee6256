//! End-to-end tests for the client crate against a running storefront.
//!
//! These tests require:
//! - A running `PostgreSQL` database with migrations and seed data applied
//! - The storefront server running (cargo run -p clementine-storefront)
//!
//! Run with: cargo test -p clementine-integration-tests -- --ignored

use clementine_client::{CartController, CartState, IndicatorStatus, StoreClient};
use clementine_core::VariantId;
use clementine_integration_tests::{mint_token, storefront_base_url, variant_id_by_sku};
use secrecy::SecretString;
use url::Url;

fn controller() -> CartController {
    let endpoint = Url::parse(&format!("{}/api/graphql", storefront_base_url()))
        .expect("invalid storefront URL");
    let client = StoreClient::new(endpoint, SecretString::from(mint_token(1)));
    CartController::new(client, CartState::new())
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn optimistic_add_confirms_against_the_server() {
    let controller = controller();
    let variant = VariantId::new(variant_id_by_sku("SHIRT-S").await);

    controller.clear().await.expect("clear failed");

    controller.add(variant, 3).await.expect("first add failed");
    controller.add(variant, 2).await.expect("second add failed");

    let snapshot = controller.state().snapshot();
    assert_eq!(snapshot.quantity(variant), 5);
    assert_eq!(snapshot.status(variant), IndicatorStatus::Added);

    // A fresh server read must agree with the optimistic view.
    controller.refresh().await.expect("refresh failed");
    assert_eq!(controller.state().snapshot().quantity(variant), 5);

    controller
        .set_quantity(variant, 0)
        .await
        .expect("set to zero failed");
    assert_eq!(controller.state().snapshot().quantity(variant), 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server and database"]
async fn rejected_add_rolls_back_and_surfaces_the_code() {
    let controller = controller();
    // SHIRT-L is seeded with zero stock.
    let variant = VariantId::new(variant_id_by_sku("SHIRT-L").await);

    controller.clear().await.expect("clear failed");

    let err = controller
        .add(variant, 1)
        .await
        .expect_err("zero-stock add should fail");
    assert_eq!(err.code(), Some(clementine_core::ErrorCode::OutOfStock));

    let snapshot = controller.state().snapshot();
    assert_eq!(snapshot.quantity(variant), 0);
    assert_eq!(
        snapshot.status(variant),
        IndicatorStatus::Failed(clementine_core::ErrorCode::OutOfStock)
    );
}
