//! Status enums for catalog and address entities.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a product.
///
/// Only `Active` products may be added to a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl ProductStatus {
    /// Whether variants of the product are eligible for cart operations.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Kind of a saved address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddressType {
    #[default]
    Shipping,
    Billing,
    Business,
    Warehouse,
}

impl std::fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Draft => "DRAFT",
            Self::Active => "ACTIVE",
            Self::Archived => "ARCHIVED",
        };
        f.write_str(s)
    }
}

impl std::fmt::Display for AddressType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Shipping => "SHIPPING",
            Self::Billing => "BILLING",
            Self::Business => "BUSINESS",
            Self::Warehouse => "WAREHOUSE",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_products_are_cart_eligible() {
        assert!(ProductStatus::Active.is_active());
        assert!(!ProductStatus::Draft.is_active());
        assert!(!ProductStatus::Archived.is_active());
    }

    #[test]
    fn statuses_serialize_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ProductStatus::Active).unwrap(),
            "\"ACTIVE\""
        );
        assert_eq!(
            serde_json::to_string(&AddressType::Warehouse).unwrap(),
            "\"WAREHOUSE\""
        );
    }
}
