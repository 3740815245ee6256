//! Clementine storefront client.
//!
//! Talks to the storefront GraphQL API and keeps a single shared,
//! optimistically-updated view of the cart:
//!
//! - [`StoreClient`] - thin reqwest-based GraphQL transport
//! - [`CartState`] - the one shared cart container (server state plus an
//!   optimistic overlay and per-variant indicators)
//! - [`CartController`] - glues the two: optimistic insert, fire the
//!   mutation, confirm or roll back

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart_state;
pub mod controller;
pub mod error;

pub use api::StoreClient;
pub use cart_state::{CartSnapshot, CartState, IndicatorStatus};
pub use controller::CartController;
pub use error::ClientError;
