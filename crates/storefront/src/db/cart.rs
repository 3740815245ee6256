//! Cart repository.
//!
//! The stock and product status checks live inside the SQL that mutates the
//! row, never in a separate read. Adds additionally lock the variant row in
//! a transaction so two concurrent first-time adds serialize instead of both
//! passing the guard on a pre-insert snapshot. A write that affects zero
//! rows is reported back as `false` and classified by the caller (see
//! [`crate::models::cart`]).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use clementine_core::{ProductStatus, UserId, VariantId};

use super::RepositoryError;
use crate::models::cart::CartLine;

/// Repository for cart database operations.
pub struct CartRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CartRepository<'a> {
    /// Create a new cart repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All cart lines for a user, joined with variant and product data.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn lines_for_user(&self, user_id: UserId) -> Result<Vec<CartLine>, RepositoryError> {
        let rows = sqlx::query(
            r"
            SELECT ci.variant_id, ci.quantity, ci.updated_at,
                   v.sku, v.price,
                   p.name AS product_name
            FROM cart_items ci
            JOIN product_variants v ON v.id = ci.variant_id
            JOIN products p ON p.id = v.product_id
            WHERE ci.user_id = $1
            ORDER BY ci.created_at ASC
            ",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;

        rows.iter().map(cart_line_from_row).collect()
    }

    /// Current quantity of a variant in the user's cart, if present.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn quantity_of(
        &self,
        user_id: UserId,
        variant_id: VariantId,
    ) -> Result<Option<i32>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT quantity FROM cart_items
            WHERE user_id = $1 AND variant_id = $2
            ",
        )
        .bind(user_id)
        .bind(variant_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| r.try_get::<i32, _>("quantity"))
            .transpose()
            .map_err(RepositoryError::from)
    }

    /// Conditionally add to a cart line, summing with any existing quantity.
    ///
    /// The write only lands when the variant exists, its product is ACTIVE,
    /// and tracked stock covers the new total (current cart quantity plus
    /// `quantity`). The variant row is locked for the duration of the
    /// transaction, so concurrent adds for the same variant serialize and
    /// each one evaluates the guard against the committed cart state.
    /// Returns `false` when the guard rejected the write.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if a statement fails.
    pub async fn try_add(
        &self,
        user_id: UserId,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let variant = sqlx::query("SELECT 1 FROM product_variants WHERE id = $1 FOR UPDATE")
            .bind(variant_id)
            .fetch_optional(&mut *tx)
            .await?;
        if variant.is_none() {
            tx.rollback().await?;
            return Ok(false);
        }

        // Guarded sum onto an existing line.
        let updated = sqlx::query(
            r"
            UPDATE cart_items ci
            SET quantity = ci.quantity + $3, updated_at = now()
            FROM product_variants v
            JOIN products p ON p.id = v.product_id
            WHERE ci.user_id = $1
              AND ci.variant_id = $2
              AND v.id = ci.variant_id
              AND p.status = $4
              AND (v.stock IS NULL OR v.stock >= ci.quantity + $3)
            ",
        )
        .bind(user_id)
        .bind(variant_id)
        .bind(quantity)
        .bind(ProductStatus::Active)
        .execute(&mut *tx)
        .await?;

        let written = if updated.rows_affected() > 0 {
            true
        } else {
            // No line yet, or the sum failed the guard. The NOT EXISTS
            // clause keeps a failed sum from turning into a fresh insert.
            let inserted = sqlx::query(
                r"
                INSERT INTO cart_items (user_id, variant_id, quantity)
                SELECT $1, v.id, $3
                FROM product_variants v
                JOIN products p ON p.id = v.product_id
                WHERE v.id = $2
                  AND p.status = $4
                  AND (v.stock IS NULL OR v.stock >= $3)
                  AND NOT EXISTS (
                        SELECT 1 FROM cart_items ci
                        WHERE ci.user_id = $1 AND ci.variant_id = $2)
                ",
            )
            .bind(user_id)
            .bind(variant_id)
            .bind(quantity)
            .bind(ProductStatus::Active)
            .execute(&mut *tx)
            .await?;
            inserted.rows_affected() > 0
        };

        tx.commit().await?;
        Ok(written)
    }

    /// Conditionally overwrite a cart line's quantity, re-checking stock in
    /// the same statement. Returns `false` when no row matched the guard.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn try_set_quantity(
        &self,
        user_id: UserId,
        variant_id: VariantId,
        quantity: i32,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            UPDATE cart_items ci
            SET quantity = $3, updated_at = now()
            FROM product_variants v
            WHERE ci.user_id = $1
              AND ci.variant_id = $2
              AND v.id = ci.variant_id
              AND (v.stock IS NULL OR v.stock >= $3)
            ",
        )
        .bind(user_id)
        .bind(variant_id)
        .bind(quantity)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a cart line. Returns `false` if no row existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn remove(
        &self,
        user_id: UserId,
        variant_id: VariantId,
    ) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM cart_items
            WHERE user_id = $1 AND variant_id = $2
            ",
        )
        .bind(user_id)
        .bind(variant_id)
        .execute(self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete all cart lines for a user. Returns the number of rows removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn clear(&self, user_id: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

fn cart_line_from_row(row: &PgRow) -> Result<CartLine, RepositoryError> {
    Ok(CartLine {
        variant_id: row.try_get::<VariantId, _>("variant_id")?,
        product_name: row.try_get::<String, _>("product_name")?,
        sku: row.try_get::<String, _>("sku")?,
        quantity: row.try_get::<i32, _>("quantity")?,
        unit_price: row.try_get::<Decimal, _>("price")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
