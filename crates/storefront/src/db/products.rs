//! Catalog repository.
//!
//! The storefront itself only reads the catalog (cart guards and cart line
//! joins); the create methods exist for the CLI seeder.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use clementine_core::{ProductId, ProductStatus, VariantId};

use super::RepositoryError;
use crate::models::cart::VariantGate;
use crate::models::product::{Product, ProductVariant};

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Product status and stock for a variant, used to explain a rejected
    /// conditional cart write. `None` when the variant does not exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn variant_gate(
        &self,
        variant_id: VariantId,
    ) -> Result<Option<VariantGate>, RepositoryError> {
        let row = sqlx::query(
            r"
            SELECT p.status, v.stock
            FROM product_variants v
            JOIN products p ON p.id = v.product_id
            WHERE v.id = $1
            ",
        )
        .bind(variant_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| -> Result<VariantGate, RepositoryError> {
            Ok(VariantGate {
                status: r.try_get::<ProductStatus, _>("status")?,
                stock: r.try_get::<Option<i32>, _>("stock")?,
            })
        })
        .transpose()
    }

    /// Create a product. Used by the CLI seeder.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the statement fails.
    pub async fn create_product(
        &self,
        name: &str,
        description: Option<&str>,
        status: ProductStatus,
    ) -> Result<Product, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO products (name, description, status)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, status, created_at, updated_at
            ",
        )
        .bind(name)
        .bind(description)
        .bind(status)
        .fetch_one(self.pool)
        .await?;

        product_from_row(&row)
    }

    /// Create a variant of a product. Used by the CLI seeder.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the SKU already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_variant(
        &self,
        product_id: ProductId,
        sku: &str,
        price: Decimal,
        stock: Option<i32>,
        attributes: &serde_json::Value,
    ) -> Result<ProductVariant, RepositoryError> {
        let row = sqlx::query(
            r"
            INSERT INTO product_variants (product_id, sku, price, stock, attributes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, product_id, sku, price, stock, attributes, created_at, updated_at
            ",
        )
        .bind(product_id)
        .bind(sku)
        .bind(price)
        .bind(stock)
        .bind(attributes)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("sku already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        variant_from_row(&row)
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, RepositoryError> {
    Ok(Product {
        id: row.try_get::<ProductId, _>("id")?,
        name: row.try_get::<String, _>("name")?,
        description: row.try_get::<Option<String>, _>("description")?,
        status: row.try_get::<ProductStatus, _>("status")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

fn variant_from_row(row: &PgRow) -> Result<ProductVariant, RepositoryError> {
    Ok(ProductVariant {
        id: row.try_get::<VariantId, _>("id")?,
        product_id: row.try_get::<ProductId, _>("product_id")?,
        sku: row.try_get::<String, _>("sku")?,
        price: row.try_get::<Decimal, _>("price")?,
        stock: row.try_get::<Option<i32>, _>("stock")?,
        attributes: row.try_get::<serde_json::Value, _>("attributes")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}
