//! GraphQL schema assembly.

pub mod mutation;
pub mod query;
pub mod types;

use async_graphql::{EmptySubscription, Schema};
use sqlx::PgPool;

use mutation::MutationRoot;
use query::QueryRoot;

/// The storefront's executable schema type.
pub type StorefrontSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

/// Build the schema with the database pool available to every resolver.
#[must_use]
pub fn build_schema(pool: PgPool) -> StorefrontSchema {
    Schema::build(QueryRoot, MutationRoot, EmptySubscription)
        .data(pool)
        .finish()
}
