//! Catalog domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use clementine_core::{ProductId, ProductStatus, VariantId};

/// A product (domain type).
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub status: ProductStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A purchasable SKU of a product.
///
/// `stock` of `None` means the variant does not track inventory.
#[derive(Debug, Clone)]
pub struct ProductVariant {
    pub id: VariantId,
    pub product_id: ProductId,
    pub sku: String,
    pub price: Decimal,
    pub stock: Option<i32>,
    /// Free-form key/value attributes (size, color, ...).
    pub attributes: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
