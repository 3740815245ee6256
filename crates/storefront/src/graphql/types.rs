//! GraphQL schema types: payloads, inputs, and the uniform mutation result.

use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use clementine_core::{AddressId, AddressType, ErrorCode, UserId, VariantId};

use crate::error::StoreError;
use crate::models;

/// Uniform result payload returned by every mutation.
///
/// `success` is the single source of truth; on failure `code` and `message`
/// say why. No mutation throws a GraphQL error for a business rejection.
#[derive(Debug, Clone, SimpleObject)]
pub struct MutationResult {
    pub success: bool,
    pub code: Option<ErrorCode>,
    pub message: Option<String>,
}

impl MutationResult {
    /// A successful result.
    #[must_use]
    pub const fn ok() -> Self {
        Self {
            success: true,
            code: None,
            message: None,
        }
    }

    /// A failed result with a code and its default message.
    #[must_use]
    pub fn err(code: ErrorCode) -> Self {
        Self {
            success: false,
            code: Some(code),
            message: Some(code.message().to_string()),
        }
    }

    /// Collapse a resolver-internal result into the uniform payload,
    /// capturing server-side errors on the way.
    #[must_use]
    pub fn from_store(result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => Self::ok(),
            Err(err) => {
                err.capture();
                Self {
                    success: false,
                    code: Some(err.code()),
                    message: Some(err.client_message()),
                }
            }
        }
    }
}

/// One line of the caller's cart.
#[derive(Debug, Clone, SimpleObject)]
pub struct CartLine {
    pub variant_id: VariantId,
    pub product_name: String,
    pub sku: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub updated_at: DateTime<Utc>,
}

impl From<models::CartLine> for CartLine {
    fn from(line: models::CartLine) -> Self {
        let line_total = line.line_total();
        Self {
            variant_id: line.variant_id,
            product_name: line.product_name,
            sku: line.sku,
            quantity: line.quantity,
            unit_price: line.unit_price,
            line_total,
            updated_at: line.updated_at,
        }
    }
}

/// The caller's cart with aggregate totals.
#[derive(Debug, Clone, SimpleObject)]
pub struct Cart {
    pub items: Vec<CartLine>,
    pub subtotal: Decimal,
    pub total_quantity: i64,
}

impl From<models::Cart> for Cart {
    fn from(cart: models::Cart) -> Self {
        let subtotal = cart.subtotal();
        let total_quantity = cart.total_quantity();
        Self {
            items: cart.lines.into_iter().map(CartLine::from).collect(),
            subtotal,
            total_quantity,
        }
    }
}

/// A saved address.
#[derive(Debug, Clone, SimpleObject)]
pub struct Address {
    pub id: AddressId,
    pub address_type: AddressType,
    pub label: Option<String>,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub phone: Option<String>,
    pub is_default: bool,
}

impl From<models::Address> for Address {
    fn from(a: models::Address) -> Self {
        Self {
            id: a.id,
            address_type: a.address_type,
            label: a.label,
            line1: a.line1,
            line2: a.line2,
            city: a.city,
            state: a.state,
            country: a.country,
            postal_code: a.postal_code,
            phone: a.phone,
            is_default: a.is_default,
        }
    }
}

/// Profile details of the caller.
#[derive(Debug, Clone, SimpleObject)]
pub struct UserProfile {
    pub id: UserId,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<models::UserProfile> for UserProfile {
    fn from(p: models::UserProfile) -> Self {
        Self {
            id: p.id,
            email: p.email.to_string(),
            first_name: p.first_name,
            last_name: p.last_name,
            phone: p.phone,
            created_at: p.created_at,
        }
    }
}

/// Input for `addAddress`.
#[derive(Debug, Clone, InputObject)]
pub struct AddressInput {
    pub address_type: AddressType,
    pub label: Option<String>,
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub phone: Option<String>,
    #[graphql(default = false)]
    pub is_default: bool,
}

impl AddressInput {
    /// Validate and normalize into a create payload.
    ///
    /// # Errors
    ///
    /// `INVALID_INPUT` when a required field is blank after trimming.
    pub fn into_new(self) -> Result<models::NewAddress, ErrorCode> {
        models::NewAddress::from_raw(
            self.address_type,
            self.label,
            &self.line1,
            self.line2,
            &self.city,
            &self.state,
            &self.country,
            &self.postal_code,
            self.phone,
            self.is_default,
        )
    }
}

/// Input for `updateAddress`. Absent fields are left untouched.
#[derive(Debug, Clone, InputObject)]
pub struct UpdateAddressInput {
    pub id: AddressId,
    pub address_type: Option<AddressType>,
    pub label: Option<String>,
    pub line1: Option<String>,
    pub line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub postal_code: Option<String>,
    pub phone: Option<String>,
    pub is_default: Option<bool>,
}

impl UpdateAddressInput {
    /// Split into the target id and a normalized sparse patch.
    #[must_use]
    pub fn into_patch(self) -> (AddressId, models::AddressPatch) {
        let patch = models::AddressPatch::from_raw(
            self.address_type,
            self.label,
            self.line1,
            self.line2,
            self.city,
            self.state,
            self.country,
            self.postal_code,
            self.phone,
            self.is_default,
        );
        (self.id, patch)
    }
}

/// Input for `updateUserProfileDetails`.
#[derive(Debug, Clone, InputObject)]
pub struct UpdateProfileInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl UpdateProfileInput {
    /// Normalize into a sparse profile patch.
    #[must_use]
    pub fn into_patch(self) -> models::ProfilePatch {
        models::ProfilePatch::from_raw(self.first_name, self.last_name, self.phone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutation_result_err_carries_code_and_message() {
        let result = MutationResult::err(ErrorCode::NotInCart);
        assert!(!result.success);
        assert_eq!(result.code, Some(ErrorCode::NotInCart));
        assert_eq!(result.message.as_deref(), Some("item is not in the cart"));
    }

    #[test]
    fn mutation_result_from_store_redacts_internal_detail() {
        let err = StoreError::Database(crate::db::RepositoryError::DataCorruption(
            "row 17 is cursed".to_string(),
        ));
        let result = MutationResult::from_store(Err(err));
        assert!(!result.success);
        assert_eq!(result.code, Some(ErrorCode::Internal));
        assert_eq!(result.message.as_deref(), Some("internal error"));
    }

    #[test]
    fn address_input_is_trimmed_on_conversion() {
        let input = AddressInput {
            address_type: AddressType::Shipping,
            label: Some("  Home ".to_string()),
            line1: " 1 Main St ".to_string(),
            line2: None,
            city: " Springfield ".to_string(),
            state: "IL".to_string(),
            country: "US".to_string(),
            postal_code: " 62704 ".to_string(),
            phone: None,
            is_default: true,
        };

        let new = input.into_new().unwrap();
        assert_eq!(new.label.as_deref(), Some("Home"));
        assert_eq!(new.line1, "1 Main St");
        assert_eq!(new.postal_code, "62704");
        assert!(new.is_default);
    }

    #[test]
    fn blank_required_field_rejects_the_input() {
        let input = AddressInput {
            address_type: AddressType::Billing,
            label: None,
            line1: "   ".to_string(),
            line2: None,
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            country: "US".to_string(),
            postal_code: "62704".to_string(),
            phone: None,
            is_default: false,
        };

        assert_eq!(input.into_new().unwrap_err(), ErrorCode::InvalidInput);
    }

    #[test]
    fn update_input_normalizes_into_a_sparse_patch() {
        let input = UpdateAddressInput {
            id: AddressId::new(5),
            address_type: None,
            label: Some(String::new()),
            line1: Some(" 2 Elm St ".to_string()),
            line2: None,
            city: None,
            state: None,
            country: None,
            postal_code: None,
            phone: None,
            is_default: Some(false),
        };

        let (id, patch) = input.into_patch();
        assert_eq!(id, AddressId::new(5));
        assert_eq!(patch.label, None);
        assert_eq!(patch.line1.as_deref(), Some("2 Elm St"));
        assert_eq!(patch.is_default, Some(false));
    }
}
