//! HTTP routes for the storefront API.

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post};
use axum::Extension;
use tower_http::trace::TraceLayer;

use crate::middleware::{auth_context_middleware, request_id_middleware};
use crate::services::auth::AuthUser;
use crate::state::AppState;

/// Build the storefront router.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/graphql", post(graphql_handler))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .layer(from_fn_with_state(state.clone(), auth_context_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Execute a GraphQL request, carrying the auth context into the schema.
async fn graphql_handler(
    State(state): State<AppState>,
    user: Option<Extension<AuthUser>>,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut inner = request.into_inner();
    if let Some(Extension(user)) = user {
        inner = inner.data(user);
    }
    state.schema().execute(inner).await.into()
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Verifies database connectivity before returning OK.
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
