//! HTTP route handlers for admin.
//!
//! Every endpoint speaks JSON except the CSV exports.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                                  - Liveness check
//! GET  /health/ready                            - Readiness check (database ping)
//!
//! # Analytics (?range=today|7d|30d|90d or ?start=YYYY-MM-DD&end=YYYY-MM-DD)
//! GET  /api/analytics                           - KPIs and chart series
//! GET  /api/analytics/export/{name}.csv         - daily, hourly, products, categories
//! GET  /api/visitors                            - Live, today and range visitor counts
//!
//! # QR codes
//! GET   /api/qr-codes                           - List codes
//! POST  /api/qr-codes                           - Create a code
//! PATCH /api/qr-codes/{id}                      - Edit target or expiry
//!
//! # Feature toggles
//! GET  /api/features                            - List toggles
//! GET  /api/features/{key}                      - Effective value of one key
//! PUT  /api/features/{key}                      - Set a toggle
//! ```

pub mod analytics;
pub mod features;
pub mod qr_codes;
pub mod visitors;

use axum::{
    Router,
    routing::{get, patch},
};

use crate::state::AppState;

/// Create the analytics routes router.
pub fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(analytics::report))
        .route("/export/{file}", get(analytics::export))
}

/// Create the QR code routes router.
pub fn qr_code_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(qr_codes::list).post(qr_codes::create))
        .route("/{id}", patch(qr_codes::update))
}

/// Create the feature toggle routes router.
pub fn feature_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(features::list))
        .route("/{key}", get(features::show).put(features::set))
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/analytics", analytics_routes())
        .route("/api/visitors", get(visitors::counts))
        .nest("/api/qr-codes", qr_code_routes())
        .nest("/api/features", feature_routes())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use chrono::FixedOffset;
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::AdminConfig;

    /// State whose pool never connects; only paths that fail before any
    /// query can be exercised.
    fn offline_state() -> AppState {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://freshcart@localhost/freshcart_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            utc_offset: FixedOffset::east_opt(0).unwrap(),
            feature_default_enabled: true,
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://freshcart@localhost/freshcart_test")
            .unwrap();
        AppState::new(config, pool)
    }

    async fn get_status(uri: &str) -> StatusCode {
        routes()
            .with_state(offline_state())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_unknown_range_is_bad_request() {
        assert_eq!(
            get_status("/api/analytics?range=ytd").await,
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status("/api/visitors?start=2024-02-01&end=2024-01-01").await,
            StatusCode::BAD_REQUEST
        );
    }

    #[tokio::test]
    async fn test_unknown_export_is_not_found() {
        assert_eq!(
            get_status("/api/analytics/export/orders.csv").await,
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_invalid_feature_key_is_bad_request() {
        assert_eq!(
            get_status("/api/features/Not-A-Key").await,
            StatusCode::BAD_REQUEST
        );
    }
}
