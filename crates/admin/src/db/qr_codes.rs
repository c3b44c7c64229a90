//! QR code management.

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

/// Parameters for creating a QR code.
#[derive(Debug)]
pub struct NewQrCode<'a> {
    pub short_code: &'a ShortCode,
    pub target_url: &'a str,
    pub kind: QrKind,
    pub settings: &'a serde_json::Value,
    pub expires_at: Option<DateTime<Utc>>,
}

const COLUMNS: &str =
    "id, short_code, target_url, kind, settings, scan_count, expires_at, created_at";

/// All codes, newest first.
///
/// # Errors
///
/// Returns error if the database query fails.
#[instrument(skip(pool))]
pub async fn list(pool: &PgPool) -> Result<Vec<QrCode>, RepositoryError> {
    let rows = sqlx::query_as::<_, QrCodeRow>(&format!(
        "SELECT {COLUMNS} FROM qr_codes ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(QrCode::from).collect())
}

/// Get a code by id.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no code has this id.
#[instrument(skip(pool))]
pub async fn get(pool: &PgPool, id: QrCodeId) -> Result<QrCode, RepositoryError> {
    sqlx::query_as::<_, QrCodeRow>(&format!("SELECT {COLUMNS} FROM qr_codes WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .map(QrCode::from)
        .ok_or(RepositoryError::NotFound)
}

/// Insert a new code.
///
/// # Errors
///
/// Returns `RepositoryError::Conflict` if the short code is taken.
#[instrument(skip(pool, params), fields(short_code = %params.short_code))]
pub async fn insert(pool: &PgPool, params: NewQrCode<'_>) -> Result<QrCode, RepositoryError> {
    let row = sqlx::query_as::<_, QrCodeRow>(&format!(
        r"
        INSERT INTO qr_codes (short_code, target_url, kind, settings, expires_at)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {COLUMNS}
        "
    ))
    .bind(params.short_code)
    .bind(params.target_url)
    .bind(params.kind)
    .bind(params.settings)
    .bind(params.expires_at)
    .fetch_one(pool)
    .await
    .map_err(|e| RepositoryError::from_insert(e, "short code"))?;

    Ok(row.into())
}

/// Change a code's target and expiry. `None` leaves a field unchanged.
///
/// # Errors
///
/// Returns `RepositoryError::NotFound` if no code has this id.
#[instrument(skip(pool))]
pub async fn update(
    pool: &PgPool,
    id: QrCodeId,
    target_url: Option<&str>,
    expires_at: Option<DateTime<Utc>>,
) -> Result<QrCode, RepositoryError> {
    sqlx::query_as::<_, QrCodeRow>(&format!(
        r"
        UPDATE qr_codes
        SET target_url = COALESCE($2, target_url),
            expires_at = COALESCE($3, expires_at)
        WHERE id = $1
        RETURNING {COLUMNS}
        "
    ))
    .bind(id)
    .bind(target_url)
    .bind(expires_at)
    .fetch_optional(pool)
    .await?
    .map(QrCode::from)
    .ok_or(RepositoryError::NotFound)
}
