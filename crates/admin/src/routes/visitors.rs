//! Visitor presence for the dashboard header.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, TimeDelta, Utc};
use freshcart_core::analytics::{ReportRange, VisitorCounts};
use freshcart_core::models::PageView;
use tracing::instrument;

use super::analytics::{AnalyticsQuery, local_today};
use crate::db::page_views;
use crate::error::Result;
use crate::state::AppState;

/// Earliest event that can affect any counter: the start of the range or a
/// full day back, whichever is older. Local midnight is never more than a
/// day before `now`.
fn events_since(range_lower: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    range_lower.min(now - TimeDelta::days(1))
}

/// Live, today and range visitor counts.
///
/// Clients poll this; each call recomputes from stored events.
#[instrument(skip(state))]
pub async fn counts(
    State(state): State<AppState>,
    Query(query): Query<AnalyticsQuery>,
) -> Result<Json<VisitorCounts>> {
    let zone = state.zone();
    let now = Utc::now();
    let range: ReportRange = query.to_report_range(local_today(zone))?;
    let (lower, _) = range.bounds(zone);

    let events: Vec<PageView> = page_views::list_since(state.pool(), events_since(lower, now)).await?;
    Ok(Json(VisitorCounts::compute(&events, now, &range, zone)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_events_since_covers_today_and_range() {
        let now = Utc.with_ymd_and_hms(2024, 6, 15, 14, 0, 0).unwrap();

        let month_ago = now - TimeDelta::days(30);
        assert_eq!(events_since(month_ago, now), month_ago);

        let this_morning = Utc.with_ymd_and_hms(2024, 6, 15, 0, 0, 0).unwrap();
        assert_eq!(events_since(this_morning, now), now - TimeDelta::days(1));
    }
}
