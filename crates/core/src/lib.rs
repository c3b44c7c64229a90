//! FreshCart Core - domain library shared by every FreshCart binary.
//!
//! - `storefront` - Public site; resolves QR short links and records page views
//! - `admin` - Back office; analytics dashboards, QR management, feature toggles
//! - `cli` - Migrations and offline reporting
//!
//! # Architecture
//!
//! The core crate holds records, types and pure computations. No database
//! access, no HTTP, no clocks: callers pass `now` in. The optional `postgres`
//! feature adds `sqlx` encoding for ids and enums.
//!
//! # Modules
//!
//! - [`types`] - Typed ids, short codes, statuses
//! - [`models`] - Plain records read from storage
//! - [`analytics`] - Normalizer, metrics, time series, visitor presence, CSV export
//! - [`features`] - Feature flag lookup with an explicit fallback
//! - [`qr`] - Short-link resolution

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod analytics;
pub mod features;
pub mod models;
pub mod qr;
pub mod types;

pub use features::FeatureFlags;
pub use qr::{MemoryQrStore, QrStore, Resolution, TargetUrlError, resolve, validate_target_url};
pub use types::*;
