//! Core types for Clementine.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod code;
pub mod email;
pub mod id;
pub mod status;

pub use code::ErrorCode;
pub use email::{Email, EmailError};
pub use id::*;
pub use status::*;
