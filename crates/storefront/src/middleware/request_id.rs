//! Request ID middleware.
//!
//! Every request gets an `x-request-id`, either the one an upstream proxy
//! already attached or a fresh UUID v4. The id flows into the request's
//! tracing span and the Sentry scope, and is echoed on the response so
//! clients can quote it in bug reports.

use axum::{extract::Request, http::HeaderValue, middleware::Next, response::Response};
use tracing::Span;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn incoming_id(request: &Request) -> Option<String> {
    let header = request.headers().get(REQUEST_ID_HEADER)?;
    header.to_str().ok().map(String::from)
}

/// Middleware that assigns and propagates a per-request id.
pub async fn request_id_middleware(request: Request, next: Next) -> Response {
    let request_id =
        incoming_id(&request).unwrap_or_else(|| Uuid::new_v4().to_string());

    Span::current().record("request_id", &request_id);
    sentry::configure_scope(|scope| {
        scope.set_tag("request_id", &request_id);
    });

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}
