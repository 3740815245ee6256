//! Address domain types.
//!
//! String fields are trimmed on the way in; empty strings are treated as
//! absent. `NewAddress` is a fully validated create payload, `AddressPatch`
//! a sparse update (only present fields are written).

use chrono::{DateTime, Utc};

use clementine_core::{AddressId, AddressType, ErrorCode, UserId};

use super::trim_to_option;

/// A saved user address (domain type).
#[derive(Debug, Clone)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
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
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated payload for creating an address.
#[derive(Debug, Clone)]
pub struct NewAddress {
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

impl NewAddress {
    /// Build a validated create payload from raw (untrimmed) parts.
    ///
    /// # Errors
    ///
    /// `INVALID_INPUT` when any required field (line1, city, state, country,
    /// postal code) is empty after trimming.
    #[allow(clippy::too_many_arguments)]
    pub fn from_raw(
        address_type: AddressType,
        label: Option<String>,
        line1: &str,
        line2: Option<String>,
        city: &str,
        state: &str,
        country: &str,
        postal_code: &str,
        phone: Option<String>,
        is_default: bool,
    ) -> Result<Self, ErrorCode> {
        let required = |value: &str| trim_to_option(Some(value)).ok_or(ErrorCode::InvalidInput);

        Ok(Self {
            address_type,
            label: trim_to_option(label.as_deref()),
            line1: required(line1)?,
            line2: trim_to_option(line2.as_deref()),
            city: required(city)?,
            state: required(state)?,
            country: required(country)?,
            postal_code: required(postal_code)?,
            phone: trim_to_option(phone.as_deref()),
            is_default,
        })
    }
}

/// Sparse update for an address.
///
/// A `None` field is left untouched. String fields are trimmed; fields that
/// trim to empty are also left untouched, mirroring the create-side rule.
#[derive(Debug, Clone, Default)]
pub struct AddressPatch {
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

impl AddressPatch {
    /// Build a sparse patch from raw optional parts, trimming strings and
    /// dropping fields that trim to empty.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub fn from_raw(
        address_type: Option<AddressType>,
        label: Option<String>,
        line1: Option<String>,
        line2: Option<String>,
        city: Option<String>,
        state: Option<String>,
        country: Option<String>,
        postal_code: Option<String>,
        phone: Option<String>,
        is_default: Option<bool>,
    ) -> Self {
        Self {
            address_type,
            label: trim_to_option(label.as_deref()),
            line1: trim_to_option(line1.as_deref()),
            line2: trim_to_option(line2.as_deref()),
            city: trim_to_option(city.as_deref()),
            state: trim_to_option(state.as_deref()),
            country: trim_to_option(country.as_deref()),
            postal_code: trim_to_option(postal_code.as_deref()),
            phone: trim_to_option(phone.as_deref()),
            is_default,
        }
    }

    /// Whether the patch writes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.address_type.is_none()
            && self.label.is_none()
            && self.line1.is_none()
            && self.line2.is_none()
            && self.city.is_none()
            && self.state.is_none()
            && self.country.is_none()
            && self.postal_code.is_none()
            && self.phone.is_none()
            && self.is_default.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_address_trims_all_string_fields() {
        let addr = NewAddress::from_raw(
            AddressType::Shipping,
            Some("  Home  ".to_string()),
            "  221B Baker St ",
            None,
            " London ",
            " Greater London ",
            " GB ",
            " NW1 6XE ",
            None,
            false,
        )
        .unwrap();

        assert_eq!(addr.label.as_deref(), Some("Home"));
        assert_eq!(addr.line1, "221B Baker St");
        assert_eq!(addr.city, "London");
        assert_eq!(addr.postal_code, "NW1 6XE");
    }

    #[test]
    fn new_address_rejects_blank_required_fields() {
        let result = NewAddress::from_raw(
            AddressType::Billing,
            None,
            "   ",
            None,
            "London",
            "Greater London",
            "GB",
            "NW1 6XE",
            None,
            false,
        );
        assert_eq!(result.unwrap_err(), ErrorCode::InvalidInput);
    }

    #[test]
    fn patch_skips_fields_that_trim_to_empty() {
        let patch = AddressPatch::from_raw(
            None,
            Some(String::new()),
            Some("  new line ".to_string()),
            None,
            Some("   ".to_string()),
            None,
            None,
            None,
            None,
            Some(true),
        );

        assert_eq!(patch.label, None);
        assert_eq!(patch.line1.as_deref(), Some("new line"));
        assert_eq!(patch.city, None);
        assert_eq!(patch.is_default, Some(true));
        assert!(!patch.is_empty());
    }

    #[test]
    fn patch_with_nothing_set_is_empty() {
        let patch = AddressPatch::from_raw(
            None, None, None, None, None, None, None, None, None, None,
        );
        assert!(patch.is_empty());
    }
}
