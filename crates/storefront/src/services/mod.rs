//! Business services for the storefront.

pub mod auth;

pub use auth::{AuthUser, TokenVerifier};
