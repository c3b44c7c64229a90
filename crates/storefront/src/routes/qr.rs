//! Short-link redirects for printed QR codes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use chrono::Utc;
use freshcart_core::{Resolution, ShortCode};
use tracing::instrument;

use crate::db::qr_codes;
use crate::error::{Result, add_breadcrumb};
use crate::state::AppState;

/// Resolve a short code and redirect.
///
/// 307 to the current target, 410 for a lapsed temporary code, 404 for
/// anything else. Only a redirect counts as a scan.
///
/// Same order as [`freshcart_core::resolve`], but async against Postgres, and
/// the scan increment re-checks expiry atomically.
#[instrument(skip(state))]
pub async fn resolve(State(state): State<AppState>, Path(code): Path<String>) -> Result<Response> {
    let Ok(short_code) = ShortCode::parse(&code) else {
        return Ok(into_response(Resolution::NotFound));
    };

    let now = Utc::now();
    let record = qr_codes::find_by_short_code(state.pool(), &short_code).await?;
    let mut resolution = Resolution::decide(record.as_ref(), now);

    if let (Resolution::RedirectTo(_), Some(qr)) = (&resolution, &record) {
        if !qr_codes::record_scan(state.pool(), qr.id, now).await? {
            tracing::info!(short_code = %short_code, "Code expired between lookup and scan");
            resolution = Resolution::Expired;
        }
    }

    if resolution.is_redirect() {
        add_breadcrumb("qr", "Short code resolved", &[("short_code", short_code.as_str())]);
    }

    Ok(into_response(resolution))
}

fn into_response(resolution: Resolution) -> Response {
    match resolution {
        Resolution::RedirectTo(target) => Redirect::temporary(&target).into_response(),
        Resolution::Expired => (StatusCode::GONE, "This code has expired").into_response(),
        Resolution::NotFound => (StatusCode::NOT_FOUND, "Unknown code").into_response(),
    }
}
