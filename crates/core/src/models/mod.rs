//! Read-only records the engine consumes.
//!
//! These mirror database rows but carry no persistence logic. The storefront
//! and admin crates map their `sqlx` rows into these types.

pub mod catalog;
pub mod feature;
pub mod order;
pub mod page_view;
pub mod qr_code;

pub use catalog::{Category, Product};
pub use feature::FeatureToggle;
pub use order::{Order, OrderItem};
pub use page_view::PageView;
pub use qr_code::QrCode;
