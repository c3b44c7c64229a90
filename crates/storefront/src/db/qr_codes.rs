//! QR code lookups for the redirect endpoint.

use chrono::{DateTime, Utc};
use freshcart_core::models::QrCode;
use freshcart_core::{QrCodeId, QrKind, ShortCode};
use sqlx::PgPool;
use tracing::instrument;

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct QrCodeRow {
    id: QrCodeId,
    short_code: ShortCode,
    target_url: String,
    kind: QrKind,
    settings: serde_json::Value,
    scan_count: i64,
    expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

impl From<QrCodeRow> for QrCode {
    fn from(row: QrCodeRow) -> Self {
        Self {
            id: row.id,
            short_code: row.short_code,
            target_url: row.target_url,
            kind: row.kind,
            settings: row.settings,
            scan_count: row.scan_count,
            expires_at: row.expires_at,
            created_at: row.created_at,
        }
    }
}

/// Fetch the current record for a short code.
///
/// # Errors
///
/// Returns error if the database query fails.
#[instrument(skip(pool), fields(short_code = %short_code))]
pub async fn find_by_short_code(
    pool: &PgPool,
    short_code: &ShortCode,
) -> Result<Option<QrCode>, RepositoryError> {
    let row = sqlx::query_as::<_, QrCodeRow>(
        r"
        SELECT id, short_code, target_url, kind, settings, scan_count, expires_at, created_at
        FROM qr_codes
        WHERE short_code = $1
        ",
    )
    .bind(short_code)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(QrCode::from))
}

/// Count a scan, unless the code lapsed since it was read.
///
/// The expiry check is repeated in the `WHERE` clause so a temporary code
/// that expires between lookup and update is never counted. Returns `false`
/// when no row was updated.
///
/// # Errors
///
/// Returns error if the database update fails.
#[instrument(skip(pool))]
pub async fn record_scan(
    pool: &PgPool,
    id: QrCodeId,
    now: DateTime<Utc>,
) -> Result<bool, RepositoryError> {
    let result = sqlx::query(
        r"
        UPDATE qr_codes
        SET scan_count = scan_count + 1
        WHERE id = $1
          AND (kind <> 'temporary' OR expires_at IS NULL OR expires_at > $2)
        ",
    )
    .bind(id)
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}
