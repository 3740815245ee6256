//! Mutation root.
//!
//! Every mutation resolver returns [`MutationResult`] directly: business
//! failures never become GraphQL errors. Each resolver delegates to an inner
//! function returning [`StoreResult`], and the boundary collapses that into
//! the uniform payload.

use async_graphql::{Context, Object, Result};
use sqlx::PgPool;

use clementine_core::{ErrorCode, VariantId};

use crate::db::{AddressRepository, CartRepository, ProductRepository, UserRepository};
use crate::error::{StoreError, StoreResult};
use crate::models::cart;
use crate::services::auth::AuthUser;

use super::query::authenticated;
use super::types::{AddressInput, MutationResult, UpdateAddressInput, UpdateProfileInput};

/// Root mutation object of the storefront schema.
pub struct MutationRoot;

#[Object]
impl MutationRoot {
    /// Add a variant to the caller's cart, summing quantities if the line
    /// already exists. Stock and product status are checked in the same
    /// statement that writes the row.
    async fn add_to_cart(
        &self,
        ctx: &Context<'_>,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<MutationResult> {
        Ok(MutationResult::from_store(
            add_to_cart_inner(ctx, variant_id, quantity).await,
        ))
    }

    /// Remove a variant from the caller's cart entirely.
    async fn remove_from_cart(
        &self,
        ctx: &Context<'_>,
        variant_id: VariantId,
    ) -> Result<MutationResult> {
        Ok(MutationResult::from_store(
            remove_from_cart_inner(ctx, variant_id).await,
        ))
    }

    /// Overwrite the quantity of a cart line. Zero removes the line.
    async fn update_cart_quantity(
        &self,
        ctx: &Context<'_>,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<MutationResult> {
        Ok(MutationResult::from_store(
            update_cart_quantity_inner(ctx, variant_id, quantity).await,
        ))
    }

    /// Empty the caller's cart. Succeeds even when already empty.
    async fn clear_cart(&self, ctx: &Context<'_>) -> Result<MutationResult> {
        Ok(MutationResult::from_store(clear_cart_inner(ctx).await))
    }

    /// Save a new address for the caller.
    async fn add_address(
        &self,
        ctx: &Context<'_>,
        input: AddressInput,
    ) -> Result<MutationResult> {
        Ok(MutationResult::from_store(
            add_address_inner(ctx, input).await,
        ))
    }

    /// Apply a sparse update to an address the caller owns.
    async fn update_address(
        &self,
        ctx: &Context<'_>,
        input: UpdateAddressInput,
    ) -> Result<MutationResult> {
        Ok(MutationResult::from_store(
            update_address_inner(ctx, input).await,
        ))
    }

    /// Apply a sparse update to the caller's profile.
    async fn update_user_profile_details(
        &self,
        ctx: &Context<'_>,
        input: UpdateProfileInput,
    ) -> Result<MutationResult> {
        Ok(MutationResult::from_store(
            update_profile_inner(ctx, input).await,
        ))
    }
}

fn context<'a>(ctx: &'a Context<'_>) -> StoreResult<(AuthUser, &'a PgPool)> {
    let user = authenticated(ctx)?;
    let pool = ctx
        .data::<PgPool>()
        .map_err(|_| StoreError::Rejected(ErrorCode::Internal))?;
    Ok((user, pool))
}

async fn add_to_cart_inner(
    ctx: &Context<'_>,
    variant_id: VariantId,
    quantity: i32,
) -> StoreResult<()> {
    let (user, pool) = context(ctx)?;
    cart::validate_add_quantity(quantity).map_err(StoreError::Rejected)?;

    let repo = CartRepository::new(pool);
    if repo.try_add(user.id, variant_id, quantity).await? {
        return Ok(());
    }

    // The guard rejected the write; re-read to say why. The answer can be
    // stale under contention, but the cart itself never over-commits.
    let in_cart = repo.quantity_of(user.id, variant_id).await?.unwrap_or(0);
    let gate = ProductRepository::new(pool).variant_gate(variant_id).await?;
    let requested = i64::from(quantity) + i64::from(in_cart);

    Err(StoreError::Rejected(cart::classify_add_failure(
        gate, requested,
    )))
}

async fn remove_from_cart_inner(ctx: &Context<'_>, variant_id: VariantId) -> StoreResult<()> {
    let (user, pool) = context(ctx)?;

    if CartRepository::new(pool).remove(user.id, variant_id).await? {
        Ok(())
    } else {
        Err(StoreError::Rejected(ErrorCode::NotInCart))
    }
}

async fn update_cart_quantity_inner(
    ctx: &Context<'_>,
    variant_id: VariantId,
    quantity: i32,
) -> StoreResult<()> {
    let (user, pool) = context(ctx)?;
    cart::validate_update_quantity(quantity).map_err(StoreError::Rejected)?;

    let repo = CartRepository::new(pool);

    // Zero means remove.
    if quantity == 0 {
        return if repo.remove(user.id, variant_id).await? {
            Ok(())
        } else {
            Err(StoreError::Rejected(ErrorCode::NotInCart))
        };
    }

    if repo.try_set_quantity(user.id, variant_id, quantity).await? {
        return Ok(());
    }

    let in_cart = repo.quantity_of(user.id, variant_id).await?.is_some();
    let gate = ProductRepository::new(pool).variant_gate(variant_id).await?;

    Err(StoreError::Rejected(cart::classify_update_failure(
        in_cart,
        gate,
        i64::from(quantity),
    )))
}

async fn clear_cart_inner(ctx: &Context<'_>) -> StoreResult<()> {
    let (user, pool) = context(ctx)?;
    let removed = CartRepository::new(pool).clear(user.id).await?;
    tracing::debug!(user_id = %user.id, removed, "Cleared cart");
    Ok(())
}

async fn add_address_inner(ctx: &Context<'_>, input: AddressInput) -> StoreResult<()> {
    let (user, pool) = context(ctx)?;
    let new = input.into_new().map_err(StoreError::Rejected)?;

    AddressRepository::new(pool).create(user.id, &new).await?;
    Ok(())
}

async fn update_address_inner(ctx: &Context<'_>, input: UpdateAddressInput) -> StoreResult<()> {
    let (user, pool) = context(ctx)?;
    let (address_id, patch) = input.into_patch();

    if patch.is_empty() {
        return Err(StoreError::Rejected(ErrorCode::InvalidInput));
    }

    let updated = AddressRepository::new(pool)
        .update_owned(user.id, address_id, &patch)
        .await?;

    // Not-found and not-owned are deliberately the same answer.
    match updated {
        Some(_) => Ok(()),
        None => Err(StoreError::Rejected(ErrorCode::AddressNotFound)),
    }
}

async fn update_profile_inner(ctx: &Context<'_>, input: UpdateProfileInput) -> StoreResult<()> {
    let (user, pool) = context(ctx)?;
    let patch = input.into_patch();

    if patch.is_empty() {
        return Err(StoreError::Rejected(ErrorCode::InvalidInput));
    }

    let updated = UserRepository::new(pool).update_profile(user.id, &patch).await?;
    match updated {
        Some(_) => Ok(()),
        None => Err(StoreError::Database(crate::db::RepositoryError::NotFound)),
    }
}
