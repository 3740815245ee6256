//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::graphql::{self, StorefrontSchema};
use crate::services::auth::TokenVerifier;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    verifier: TokenVerifier,
    schema: StorefrontSchema,
}

impl AppState {
    /// Build the shared state, including the executable GraphQL schema.
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let verifier = TokenVerifier::new(&config.auth);
        let schema = graphql::build_schema(pool.clone());

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                verifier,
                schema,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn verifier(&self) -> &TokenVerifier {
        &self.inner.verifier
    }

    #[must_use]
    pub fn schema(&self) -> &StorefrontSchema {
        &self.inner.schema
    }
}
