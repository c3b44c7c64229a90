//! Page-view reads for visitor presence.

use chrono::{DateTime, Utc};
use freshcart_core::SessionId;
use freshcart_core::models::PageView;
use sqlx::PgPool;
use tracing::instrument;

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct PageViewRow {
    session_id: String,
    path: Option<String>,
    created_at: DateTime<Utc>,
}

/// Page views created at or after `since`, oldest first.
///
/// # Errors
///
/// Returns error if the database query fails.
#[instrument(skip(pool))]
pub async fn list_since(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<PageView>, RepositoryError> {
    let rows = sqlx::query_as::<_, PageViewRow>(
        r"
        SELECT session_id, path, created_at
        FROM page_views
        WHERE created_at >= $1
        ORDER BY created_at
        ",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PageView {
            session_id: SessionId::from(row.session_id),
            path: row.path,
            created_at: row.created_at,
        })
        .collect())
}
