//! Authentication middleware.
//!
//! Extracts and verifies the `Authorization: Bearer` token on every request
//! and, when valid, stashes an [`crate::services::auth::AuthUser`] in the
//! request extensions. The
//! middleware never rejects requests itself - resolvers decide whether an
//! operation needs auth, so unauthenticated callers get the uniform
//! `UNAUTHENTICATED` code instead of a transport-level 401.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Middleware that resolves the bearer token into an auth context.
pub async fn auth_context_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "));

    if let Some(token) = token {
        match state.verifier().verify(token) {
            Ok(user) => {
                tracing::Span::current().record("user_id", user.id.as_i32());
                request.extensions_mut().insert(user);
            }
            Err(e) => {
                // An invalid token downgrades to anonymous; resolvers
                // report UNAUTHENTICATED through the normal channel.
                tracing::debug!(error = %e, "rejected bearer token");
            }
        }
    }

    next.run(request).await
}
