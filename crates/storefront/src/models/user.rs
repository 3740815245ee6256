//! User profile domain types.

use chrono::{DateTime, Utc};

use clementine_core::{Email, UserId};

use super::trim_to_option;

/// Profile details of a storefront user.
#[derive(Debug, Clone)]
pub struct UserProfile {
    pub id: UserId,
    pub email: Email,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sparse update for profile fields, trimmed on construction.
#[derive(Debug, Clone, Default)]
pub struct ProfilePatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl ProfilePatch {
    /// Build a patch from raw optional parts, trimming strings and dropping
    /// fields that trim to empty.
    #[must_use]
    pub fn from_raw(
        first_name: Option<String>,
        last_name: Option<String>,
        phone: Option<String>,
    ) -> Self {
        Self {
            first_name: trim_to_option(first_name.as_deref()),
            last_name: trim_to_option(last_name.as_deref()),
            phone: trim_to_option(phone.as_deref()),
        }
    }

    /// Whether the patch writes anything at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none() && self.phone.is_none()
    }
}
