//! Domain types for the storefront.
//!
//! These types represent validated domain objects separate from database row
//! types and from the GraphQL schema types.

pub mod address;
pub mod cart;
pub mod product;
pub mod user;

pub use address::{Address, AddressPatch, NewAddress};
pub use cart::{Cart, CartLine};
pub use product::{Product, ProductVariant};
pub use user::{ProfilePatch, UserProfile};

/// Trim a string, returning `None` when the result is empty.
///
/// Shared by the address and profile sparse-merge paths: an empty or
/// whitespace-only string is treated as "field absent", never written.
#[must_use]
pub fn trim_to_option(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trim_to_option_drops_empty_and_whitespace() {
        assert_eq!(trim_to_option(None), None);
        assert_eq!(trim_to_option(Some("")), None);
        assert_eq!(trim_to_option(Some("   ")), None);
    }

    #[test]
    fn trim_to_option_trims_surrounding_whitespace() {
        assert_eq!(
            trim_to_option(Some("  221B Baker St  ")),
            Some("221B Baker St".to_string())
        );
    }
}
