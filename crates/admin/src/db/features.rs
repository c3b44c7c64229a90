//! Feature toggle storage.

use freshcart_core::models::FeatureToggle;
use sqlx::PgPool;
use tracing::instrument;

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct FeatureToggleRow {
    key: String,
    enabled: bool,
}

impl From<FeatureToggleRow> for FeatureToggle {
    fn from(row: FeatureToggleRow) -> Self {
        Self {
            key: row.key,
            enabled: row.enabled,
        }
    }
}

/// All stored toggles in key order.
///
/// # Errors
///
/// Returns error if the database query fails.
#[instrument(skip(pool))]
pub async fn list(pool: &PgPool) -> Result<Vec<FeatureToggle>, RepositoryError> {
    let rows = sqlx::query_as::<_, FeatureToggleRow>(
        "SELECT key, enabled FROM feature_toggles ORDER BY key",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(FeatureToggle::from).collect())
}

/// Create or overwrite a toggle.
///
/// # Errors
///
/// Returns error if the database upsert fails.
#[instrument(skip(pool))]
pub async fn upsert(
    pool: &PgPool,
    key: &str,
    enabled: bool,
) -> Result<FeatureToggle, RepositoryError> {
    let row = sqlx::query_as::<_, FeatureToggleRow>(
        r"
        INSERT INTO feature_toggles (key, enabled)
        VALUES ($1, $2)
        ON CONFLICT (key) DO UPDATE SET enabled = EXCLUDED.enabled, updated_at = NOW()
        RETURNING key, enabled
        ",
    )
    .bind(key)
    .bind(enabled)
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}
