//! Query root.
//!
//! Every query requires an authenticated caller. Failures surface as GraphQL
//! errors carrying a `code` extension (see [`crate::error`]).

use async_graphql::{Context, Object, Result};
use sqlx::PgPool;

use clementine_core::AddressId;

use crate::db::{AddressRepository, CartRepository, UserRepository};
use crate::error::StoreError;
use crate::models;
use crate::services::auth::AuthUser;

use super::types::{Address, Cart, UserProfile};

/// Root query object of the storefront schema.
pub struct QueryRoot;

#[Object]
impl QueryRoot {
    /// The caller's cart with per-line and aggregate totals.
    async fn get_my_cart(&self, ctx: &Context<'_>) -> Result<Cart> {
        let user = authenticated(ctx).map_err(StoreError::into_graphql)?;
        let pool = ctx.data::<PgPool>()?;

        let lines = CartRepository::new(pool)
            .lines_for_user(user.id)
            .await
            .map_err(|err| StoreError::from(err).into_graphql())?;

        Ok(Cart::from(models::Cart { lines }))
    }

    /// One address by id, only if the caller owns it.
    async fn get_address(&self, ctx: &Context<'_>, id: AddressId) -> Result<Option<Address>> {
        let user = authenticated(ctx).map_err(StoreError::into_graphql)?;
        let pool = ctx.data::<PgPool>()?;

        let address = AddressRepository::new(pool)
            .get_owned(user.id, id)
            .await
            .map_err(|err| StoreError::from(err).into_graphql())?;

        Ok(address.map(Address::from))
    }

    /// All addresses of the caller, defaults first.
    async fn get_address_of_user(&self, ctx: &Context<'_>) -> Result<Vec<Address>> {
        let user = authenticated(ctx).map_err(StoreError::into_graphql)?;
        let pool = ctx.data::<PgPool>()?;

        let addresses = AddressRepository::new(pool)
            .list_for_user(user.id)
            .await
            .map_err(|err| StoreError::from(err).into_graphql())?;

        Ok(addresses.into_iter().map(Address::from).collect())
    }

    /// Profile details of the caller.
    async fn get_user_profile_details(&self, ctx: &Context<'_>) -> Result<UserProfile> {
        let user = authenticated(ctx).map_err(StoreError::into_graphql)?;
        let pool = ctx.data::<PgPool>()?;

        let profile = UserRepository::new(pool)
            .get_profile(user.id)
            .await
            .map_err(|err| StoreError::from(err).into_graphql())?
            // The token referenced a user row that does not exist. That is a
            // provisioning error, not a client mistake.
            .ok_or(StoreError::Database(crate::db::RepositoryError::NotFound))
            .map_err(StoreError::into_graphql)?;

        Ok(UserProfile::from(profile))
    }
}

/// The authenticated caller, or an `UNAUTHENTICATED` error.
pub(super) fn authenticated(ctx: &Context<'_>) -> Result<AuthUser, StoreError> {
    ctx.data_opt::<AuthUser>()
        .cloned()
        .ok_or(StoreError::Unauthenticated)
}
