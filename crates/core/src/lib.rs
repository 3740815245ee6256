//! Clementine Core - Shared types library.
//!
//! This crate provides common types used across all Clementine components:
//! - `storefront` - GraphQL API server
//! - `client` - API client with shared optimistic cart state
//! - `cli` - Command-line tools for migrations and seeding
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. The `postgres` feature adds sqlx encode/decode support for the
//! newtypes; the `graphql` feature adds async-graphql scalar and enum support
//! so the same types can appear directly in the schema.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, statuses, and
//!   the uniform mutation error codes

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
