//! Storefront error type.
//!
//! The storefront fails in two ways: the database is unavailable, or a
//! beacon payload is malformed. Unknown and expired QR codes are not errors;
//! they are ordinary [`Resolution`](freshcart_core::Resolution) outcomes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::RepositoryError;

#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed. Reported to Sentry, hidden from clients.
    #[error("Database error: {0}")]
    Database(#[from] RepositoryError),

    /// Malformed request body.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            Self::Database(_) => {
                let event_id = sentry::capture_error(&self);
                tracing::error!(
                    error = %self,
                    sentry_event_id = %event_id,
                    "Storefront database error"
                );
                (StatusCode::SERVICE_UNAVAILABLE, "Temporarily unavailable").into_response()
            }
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()).into_response(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb so later Sentry events show what led up to them.
pub fn add_breadcrumb(category: &str, message: &str, data: &[(&str, &str)]) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };
    breadcrumb.data.extend(
        data.iter()
            .map(|(key, value)| ((*key).to_string(), serde_json::Value::from(*value))),
    );
    sentry::add_breadcrumb(breadcrumb);
}
