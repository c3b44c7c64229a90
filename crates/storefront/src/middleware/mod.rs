//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (`http_request` span)
//! 3. Request ID (record on span, echo in response)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
