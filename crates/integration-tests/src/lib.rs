//! Integration tests for FreshCart.
//!
//! # Running Tests
//!
//! ```bash
//! # Engine tests (no services needed)
//! cargo test -p freshcart-integration-tests
//!
//! # Live tests against running binaries and a migrated database
//! cargo run -p freshcart-cli -- migrate
//! cargo test -p freshcart-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_URL` - Base URL of a running storefront (default: `http://127.0.0.1:3000`)
//! - `ADMIN_URL` - Base URL of a running admin API (default: `http://127.0.0.1:3001`)
//!
//! # Test Categories
//!
//! - `analytics_pipeline` - Report building over in-memory rows
//! - `qr_resolution` - Short-link resolution over [`MemoryQrStore`](freshcart_core::MemoryQrStore)
//! - `admin_api`, `storefront_qr` - HTTP tests, ignored unless services are up

use chrono::{DateTime, TimeZone, Utc};
use freshcart_core::models::{Category, Order, OrderItem, PageView, Product, QrCode};
use freshcart_core::{
    CategoryId, OrderId, OrderItemId, OrderStatus, ProductId, QrCodeId, QrKind, SessionId,
    ShortCode, UserId,
};
use rust_decimal::Decimal;

/// Base URL of the storefront under test.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_URL").unwrap_or_else(|_| "http://127.0.0.1:3000".to_owned())
}

/// Base URL of the admin API under test.
#[must_use]
pub fn admin_url() -> String {
    std::env::var("ADMIN_URL").unwrap_or_else(|_| "http://127.0.0.1:3001".to_owned())
}

/// A UTC instant; panics on an invalid date, which only fixtures produce.
#[must_use]
pub fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .unwrap_or_else(|| panic!("invalid fixture date {year}-{month}-{day}"))
}

/// Whole currency units, e.g. `money(100)` is 100.00.
#[must_use]
pub fn money(units: i64) -> Decimal {
    Decimal::new(units * 100, 2)
}

#[must_use]
pub fn category(name: &str) -> Category {
    Category {
        id: CategoryId::generate(),
        name: name.to_owned(),
    }
}

#[must_use]
pub fn product(name: &str, category: Option<&Category>) -> Product {
    Product {
        id: ProductId::generate(),
        name: name.to_owned(),
        category_id: category.map(|c| c.id),
    }
}

#[must_use]
pub fn order(
    user_id: UserId,
    status: OrderStatus,
    total: Decimal,
    created_at: DateTime<Utc>,
) -> Order {
    Order {
        id: OrderId::generate(),
        user_id,
        status,
        total,
        created_at,
    }
}

/// A line item stamped with its order's creation time.
#[must_use]
pub fn item(order: &Order, product: &Product, quantity: u32, price: Decimal) -> OrderItem {
    OrderItem {
        id: OrderItemId::generate(),
        order_id: order.id,
        product_id: product.id,
        product_name: product.name.clone(),
        quantity,
        price,
        created_at: order.created_at,
    }
}

#[must_use]
pub fn page_view(session: &str, created_at: DateTime<Utc>) -> PageView {
    PageView {
        session_id: SessionId::new(session),
        path: Some("/".to_owned()),
        created_at,
    }
}

/// A code created at the start of 2024 with no scans.
#[must_use]
pub fn qr_code(
    short_code: &str,
    kind: QrKind,
    target_url: &str,
    expires_at: Option<DateTime<Utc>>,
) -> QrCode {
    QrCode {
        id: QrCodeId::generate(),
        short_code: ShortCode::parse(short_code)
            .unwrap_or_else(|e| panic!("invalid fixture code {short_code}: {e}")),
        target_url: target_url.to_owned(),
        kind,
        settings: serde_json::json!({}),
        scan_count: 0,
        expires_at,
        created_at: at(2024, 1, 1, 0, 0),
    }
}
