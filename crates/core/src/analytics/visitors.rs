//! Live, daily and range visitor counts from page-view events.
//!
//! This is a pure function of the events and a reference time. Callers that
//! want a live dashboard re-run it on their own schedule, typically whenever a
//! realtime subscription delivers a fresh batch.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveTime, TimeDelta, Utc};
use serde::Serialize;

use super::range::{ReportRange, local_to_utc};
use crate::models::PageView;
use crate::types::SessionId;

/// Sessions seen within this many minutes before `now` count as live.
pub const LIVE_WINDOW_MINUTES: i64 = 5;

/// Visitor presence counters for the dashboard header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VisitorCounts {
    /// Distinct sessions active in the last five minutes.
    pub live_visitors: u64,
    /// Distinct sessions active since local midnight.
    pub today_visitors: u64,
    /// Page loads (not sessions) within the report range.
    pub total_page_views: u64,
}

impl VisitorCounts {
    /// Count visitors relative to `now`.
    ///
    /// "Today" starts at midnight of `now`'s calendar day in `zone`.
    #[must_use]
    pub fn compute(
        events: &[PageView],
        now: DateTime<Utc>,
        range: &ReportRange,
        zone: &FixedOffset,
    ) -> Self {
        let live_since = now - TimeDelta::minutes(LIVE_WINDOW_MINUTES);
        let today_since = local_to_utc(
            now.with_timezone(zone).date_naive().and_time(NaiveTime::MIN),
            zone,
        );

        let mut live: HashSet<&SessionId> = HashSet::new();
        let mut today: HashSet<&SessionId> = HashSet::new();
        let mut total_page_views = 0u64;

        for event in events {
            if (live_since..=now).contains(&event.created_at) {
                live.insert(&event.session_id);
            }
            if event.created_at >= today_since {
                today.insert(&event.session_id);
            }
            if range.contains(event.created_at, zone) {
                total_page_views += 1;
            }
        }

        Self {
            live_visitors: live.len() as u64,
            today_visitors: today.len() as u64,
            total_page_views,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveDate, TimeZone};

    use super::*;

    fn view(session: &str, at: DateTime<Utc>) -> PageView {
        PageView {
            session_id: session.into(),
            path: Some("/".to_string()),
            created_at: at,
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 14, 0, 0).unwrap()
    }

    fn june() -> ReportRange {
        ReportRange::new(
            NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_events_are_zero() {
        let counts = VisitorCounts::compute(&[], now(), &june(), &utc());
        assert_eq!(counts, VisitorCounts::default());
    }

    #[test]
    fn test_sessions_are_deduplicated_but_views_are_not() {
        let events = vec![
            view("a", now() - TimeDelta::minutes(1)),
            view("a", now() - TimeDelta::minutes(2)),
            view("b", now() - TimeDelta::minutes(4)),
            view("c", now() - TimeDelta::minutes(30)),
            view("d", now() - TimeDelta::days(3)),
        ];
        let counts = VisitorCounts::compute(&events, now(), &june(), &utc());

        assert_eq!(counts.live_visitors, 2);
        assert_eq!(counts.today_visitors, 3);
        assert_eq!(counts.total_page_views, 5);
    }

    #[test]
    fn test_live_window_boundary_is_inclusive() {
        let window = TimeDelta::minutes(LIVE_WINDOW_MINUTES);
        let events = vec![
            view("edge", now() - window),
            view("stale", now() - window - TimeDelta::seconds(1)),
        ];
        let counts = VisitorCounts::compute(&events, now(), &june(), &utc());
        assert_eq!(counts.live_visitors, 1);
    }

    #[test]
    fn test_future_events_are_not_live() {
        let events = vec![
            view("at-now", now()),
            view("clock-skew", now() + TimeDelta::seconds(30)),
        ];
        let counts = VisitorCounts::compute(&events, now(), &june(), &utc());
        assert_eq!(counts.live_visitors, 1);
    }

    #[test]
    fn test_today_follows_reporting_zone() {
        // 14:00 UTC is 00:30 on June 16 in UTC+10:30
        let zone = FixedOffset::east_opt(10 * 3600 + 1800).unwrap();
        let events = vec![
            view("before-local-midnight", now() - TimeDelta::hours(1)),
            view("after-local-midnight", now() - TimeDelta::minutes(10)),
        ];
        let counts = VisitorCounts::compute(&events, now(), &june(), &zone);
        assert_eq!(counts.today_visitors, 1);
    }

    #[test]
    fn test_page_views_outside_range_are_excluded() {
        let events = vec![
            view("may", Utc.with_ymd_and_hms(2024, 5, 31, 12, 0, 0).unwrap()),
            view("june", Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap()),
        ];
        let counts = VisitorCounts::compute(&events, now(), &june(), &utc());
        assert_eq!(counts.total_page_views, 1);
    }
}
