//! Page-view event capture.

use freshcart_core::SessionId;
use sqlx::PgPool;
use tracing::instrument;

use super::RepositoryError;

/// Append one page-view event stamped with the database clock.
///
/// # Errors
///
/// Returns error if the database insert fails.
#[instrument(skip(pool))]
pub async fn insert(
    pool: &PgPool,
    session_id: &SessionId,
    path: Option<&str>,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO page_views (session_id, path)
        VALUES ($1, $2)
        ",
    )
    .bind(session_id.as_str())
    .bind(path)
    .execute(pool)
    .await?;

    Ok(())
}
