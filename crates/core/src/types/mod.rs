//! Core types for FreshCart.
//!
//! This module provides type-safe wrappers for identifiers, statuses and
//! short codes shared by the storefront, admin and CLI.

pub mod id;
pub mod short_code;
pub mod status;

pub use id::*;
pub use short_code::{ShortCode, ShortCodeError};
pub use status::{OrderStatus, ParseEnumError, QrKind};
