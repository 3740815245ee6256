//! Uniform error codes for mutation results.
//!
//! Every mutation in the API returns a `MutationResult` carrying a success
//! flag and, on failure, one of these codes. The same enum is used by the
//! client crate to classify failures, so it lives in core.

use serde::{Deserialize, Serialize};

/// Machine-readable failure codes surfaced by mutations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(async_graphql::Enum))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// No valid bearer token accompanied the request.
    Unauthenticated,
    /// Quantity was below the minimum (or negative for updates).
    InvalidQuantity,
    /// The referenced product variant does not exist.
    VariantNotFound,
    /// The variant tracks stock and has less than the requested quantity.
    OutOfStock,
    /// The variant's product is not ACTIVE.
    ProductInactive,
    /// No cart row exists for (user, variant).
    NotInCart,
    /// The address does not exist or is not owned by the caller.
    AddressNotFound,
    /// The caller is not allowed to touch this resource.
    Forbidden,
    /// Input failed validation (missing or malformed fields).
    InvalidInput,
    /// Unexpected server-side failure.
    Internal,
}

impl ErrorCode {
    /// The wire spelling of the code (SCREAMING_SNAKE_CASE).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::InvalidQuantity => "INVALID_QUANTITY",
            Self::VariantNotFound => "VARIANT_NOT_FOUND",
            Self::OutOfStock => "OUT_OF_STOCK",
            Self::ProductInactive => "PRODUCT_INACTIVE",
            Self::NotInCart => "NOT_IN_CART",
            Self::AddressNotFound => "ADDRESS_NOT_FOUND",
            Self::Forbidden => "FORBIDDEN",
            Self::InvalidInput => "INVALID_INPUT",
            Self::Internal => "INTERNAL",
        }
    }

    /// Default human-readable message for the code.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::Unauthenticated => "authentication required",
            Self::InvalidQuantity => "quantity must be at least 1",
            Self::VariantNotFound => "product variant not found",
            Self::OutOfStock => "insufficient stock",
            Self::ProductInactive => "product is not available",
            Self::NotInCart => "item is not in the cart",
            Self::AddressNotFound => "address not found",
            Self::Forbidden => "not allowed",
            Self::InvalidInput => "invalid input",
            Self::Internal => "internal error",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
