//! Integration test harness for Clementine.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the database and apply migrations
//! cargo run -p clementine-cli -- migrate
//! cargo run -p clementine-cli -- seed
//!
//! # Start the storefront
//! cargo run -p clementine-storefront
//!
//! # Run integration tests
//! cargo test -p clementine-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_BASE_URL` - Storefront base URL (default `http://localhost:3000`)
//! - `STOREFRONT_DATABASE_URL` - Used to look up seeded catalog rows
//! - `STOREFRONT_JWT_SECRET` - Must match the running server's secret
//! - `TEST_USER_ID` - User id to mint tokens for (default 1)

use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;

/// Shared context for storefront API tests.
pub struct TestContext {
    client: Client,
    base_url: String,
    token: Option<String>,
}

#[derive(Serialize)]
struct TestClaims {
    sub: String,
    exp: i64,
    email: String,
}

/// Base URL for the storefront API (configurable via environment).
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Mint a bearer token for the given user id, signed with the server's secret.
///
/// # Panics
///
/// Panics if `STOREFRONT_JWT_SECRET` is unset or token encoding fails. Tests
/// cannot proceed without a valid token.
#[must_use]
pub fn mint_token(user_id: i32) -> String {
    let secret =
        std::env::var("STOREFRONT_JWT_SECRET").expect("STOREFRONT_JWT_SECRET must be set");

    let claims = TestClaims {
        sub: user_id.to_string(),
        exp: Utc::now().timestamp() + 3600,
        email: format!("user{user_id}@test.example"),
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode test token")
}

impl TestContext {
    /// Context authenticated as the default test user.
    #[must_use]
    pub fn authenticated() -> Self {
        let user_id = std::env::var("TEST_USER_ID")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        Self::for_user(user_id)
    }

    /// Context authenticated as a specific user id.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created.
    #[must_use]
    pub fn for_user(user_id: i32) -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            base_url: storefront_base_url(),
            token: Some(mint_token(user_id)),
        }
    }

    /// Context with no bearer token.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created.
    #[must_use]
    pub fn anonymous() -> Self {
        Self {
            client: Client::builder()
                .build()
                .expect("Failed to create HTTP client"),
            base_url: storefront_base_url(),
            token: None,
        }
    }

    /// The storefront base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying HTTP client.
    #[must_use]
    pub const fn http(&self) -> &Client {
        &self.client
    }

    /// Execute a GraphQL document and return the raw response body.
    ///
    /// # Panics
    ///
    /// Panics on transport failures or non-JSON responses; these are test
    /// environment problems, not assertions.
    pub async fn graphql(&self, query: &str, variables: Value) -> Value {
        let mut request = self
            .client
            .post(format!("{}/api/graphql", self.base_url))
            .json(&serde_json::json!({ "query": query, "variables": variables }));

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.expect("GraphQL request failed");
        assert!(
            response.status().is_success(),
            "unexpected status: {}",
            response.status()
        );
        response.json().await.expect("response was not JSON")
    }

    /// Execute a mutation and return its `MutationResult` payload.
    ///
    /// # Panics
    ///
    /// Panics when the response carries GraphQL errors or is missing the
    /// named field.
    pub async fn mutate(&self, query: &str, variables: Value, field: &str) -> Value {
        let body = self.graphql(query, variables).await;
        assert!(
            body.get("errors").is_none_or(Value::is_null),
            "unexpected GraphQL errors: {body}"
        );
        body["data"][field].clone()
    }
}

/// Look up a seeded variant id by SKU, straight from the database.
///
/// # Panics
///
/// Panics if the database is unreachable or the SKU is not seeded.
pub async fn variant_id_by_sku(sku: &str) -> i32 {
    let database_url = std::env::var("STOREFRONT_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .expect("STOREFRONT_DATABASE_URL must be set");

    let pool = sqlx::PgPool::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    let (id,): (i32,) = sqlx::query_as("SELECT id FROM product_variants WHERE sku = $1")
        .bind(sku)
        .fetch_one(&pool)
        .await
        .unwrap_or_else(|_| panic!("variant {sku} not seeded; run clementine-cli seed"));

    id
}
