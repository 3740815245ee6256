//! Cart domain types and the pure business rules for cart mutations.
//!
//! The stock check itself is folded into a single conditional SQL statement
//! (see [`crate::db::cart`]); the helpers here cover the parts that do not
//! need the database: quantity validation and classifying why a conditional
//! write affected zero rows.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use clementine_core::{ErrorCode, ProductStatus, VariantId};

/// One line of a user's cart, joined with variant and product data.
#[derive(Debug, Clone)]
pub struct CartLine {
    /// Variant in the cart.
    pub variant_id: VariantId,
    /// Product name for display.
    pub product_name: String,
    /// Variant SKU.
    pub sku: String,
    /// Quantity in the cart (always >= 1).
    pub quantity: i32,
    /// Unit price of the variant.
    pub unit_price: Decimal,
    /// When the line was last changed.
    pub updated_at: DateTime<Utc>,
}

impl CartLine {
    /// Price of the whole line (unit price times quantity).
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// A user's whole cart.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// Sum of all line totals.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Total number of items across all lines.
    #[must_use]
    pub fn total_quantity(&self) -> i64 {
        self.lines.iter().map(|l| i64::from(l.quantity)).sum()
    }
}

/// Validate the quantity argument of `addToCart`.
///
/// # Errors
///
/// `INVALID_QUANTITY` for anything below 1. Runs before any SQL, so a
/// rejected add never touches the cart.
pub const fn validate_add_quantity(quantity: i32) -> Result<(), ErrorCode> {
    if quantity < 1 {
        return Err(ErrorCode::InvalidQuantity);
    }
    Ok(())
}

/// Validate the quantity argument of `updateCartQuantity`.
///
/// Zero is allowed (it means "remove"); negative values are rejected.
///
/// # Errors
///
/// `INVALID_QUANTITY` for negative values.
pub const fn validate_update_quantity(quantity: i32) -> Result<(), ErrorCode> {
    if quantity < 0 {
        return Err(ErrorCode::InvalidQuantity);
    }
    Ok(())
}

/// Whether a variant's stock allows the requested total quantity.
///
/// `None` stock means the variant does not track inventory.
#[must_use]
pub fn stock_allows(stock: Option<i32>, requested: i64) -> bool {
    stock.is_none_or(|s| i64::from(s) >= requested)
}

/// Variant facts needed to explain a failed conditional cart write.
#[derive(Debug, Clone, Copy)]
pub struct VariantGate {
    pub status: ProductStatus,
    pub stock: Option<i32>,
}

/// Classify why an `addToCart` upsert affected zero rows.
///
/// `requested` is the quantity the guarded statement tried to reach (the
/// new quantity plus whatever was already in the cart).
#[must_use]
pub fn classify_add_failure(gate: Option<VariantGate>, requested: i64) -> ErrorCode {
    match gate {
        None => ErrorCode::VariantNotFound,
        Some(g) if !g.status.is_active() => ErrorCode::ProductInactive,
        Some(g) if !stock_allows(g.stock, requested) => ErrorCode::OutOfStock,
        // The guard passed on re-read; the original failure raced with a
        // concurrent write. Report the conservative answer.
        Some(_) => ErrorCode::OutOfStock,
    }
}

/// Classify why an `updateCartQuantity` conditional update affected zero rows.
#[must_use]
pub fn classify_update_failure(in_cart: bool, gate: Option<VariantGate>, requested: i64) -> ErrorCode {
    if !in_cart {
        return ErrorCode::NotInCart;
    }
    match gate {
        None => ErrorCode::VariantNotFound,
        Some(g) if !stock_allows(g.stock, requested) => ErrorCode::OutOfStock,
        Some(_) => ErrorCode::OutOfStock,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn line(quantity: i32, unit_price: Decimal) -> CartLine {
        CartLine {
            variant_id: VariantId::new(1),
            product_name: "Widget".to_string(),
            sku: "WID-1".to_string(),
            quantity,
            unit_price,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn add_quantity_must_be_at_least_one() {
        assert_eq!(validate_add_quantity(0), Err(ErrorCode::InvalidQuantity));
        assert_eq!(validate_add_quantity(-3), Err(ErrorCode::InvalidQuantity));
        assert!(validate_add_quantity(1).is_ok());
        assert!(validate_add_quantity(99).is_ok());
    }

    #[test]
    fn update_quantity_allows_zero_but_not_negative() {
        assert!(validate_update_quantity(0).is_ok());
        assert!(validate_update_quantity(5).is_ok());
        assert_eq!(validate_update_quantity(-1), Err(ErrorCode::InvalidQuantity));
    }

    #[test]
    fn untracked_stock_always_allows() {
        assert!(stock_allows(None, 1));
        assert!(stock_allows(None, 1_000_000));
    }

    #[test]
    fn tracked_stock_is_a_hard_ceiling() {
        assert!(stock_allows(Some(10), 10));
        assert!(!stock_allows(Some(10), 11));
        assert!(!stock_allows(Some(0), 1));
    }

    #[test]
    fn add_failure_classification() {
        assert_eq!(classify_add_failure(None, 1), ErrorCode::VariantNotFound);
        assert_eq!(
            classify_add_failure(
                Some(VariantGate {
                    status: ProductStatus::Draft,
                    stock: Some(100),
                }),
                1
            ),
            ErrorCode::ProductInactive
        );
        assert_eq!(
            classify_add_failure(
                Some(VariantGate {
                    status: ProductStatus::Active,
                    stock: Some(2),
                }),
                3
            ),
            ErrorCode::OutOfStock
        );
    }

    #[test]
    fn update_failure_classification_prefers_not_in_cart() {
        assert_eq!(
            classify_update_failure(false, None, 1),
            ErrorCode::NotInCart
        );
        assert_eq!(
            classify_update_failure(
                true,
                Some(VariantGate {
                    status: ProductStatus::Active,
                    stock: Some(1),
                }),
                5
            ),
            ErrorCode::OutOfStock
        );
    }

    #[test]
    fn cart_totals_sum_lines() {
        let cart = Cart {
            lines: vec![line(3, dec("10.00")), line(2, dec("2.50"))],
        };
        assert_eq!(cart.subtotal(), dec("35.00"));
        assert_eq!(cart.total_quantity(), 5);
    }

    #[test]
    fn empty_cart_totals_are_zero() {
        let cart = Cart::default();
        assert_eq!(cart.subtotal(), Decimal::ZERO);
        assert_eq!(cart.total_quantity(), 0);
    }
}
