//! HTTP middleware stack for the storefront API.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Auth context (verify bearer token, stash `AuthUser` in extensions)

pub mod auth;
pub mod request_id;

pub use auth::auth_context_middleware;
pub use request_id::request_id_middleware;
