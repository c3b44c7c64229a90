//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # QR short links
//! GET  /q/{code}               - 307 to target, 410 if expired, 404 if unknown
//!
//! # Instrumentation
//! POST /api/page-views         - Record a page-view event (204)
//! ```

pub mod page_views;
pub mod qr;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/q/{code}", get(qr::resolve))
        .route("/api/page-views", post(page_views::record))
}
