//! One dashboard view: range filter, then metrics and chart series.

use chrono::FixedOffset;
use serde::Serialize;

use super::metrics::SalesMetrics;
use super::normalize::{ReportInput, normalize};
use super::range::ReportRange;
use super::series::{DailyPoint, HourlyPoint, daily_series, hourly_series};
use crate::models::{Order, OrderItem};

/// Everything the analytics dashboard renders for one range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyticsReport {
    pub range: ReportRange,
    pub metrics: SalesMetrics,
    pub daily: Vec<DailyPoint>,
    pub hourly: Vec<HourlyPoint>,
}

impl AnalyticsReport {
    /// Normalize the batch, then derive metrics and both series from it.
    ///
    /// Orders and items whose `created_at` falls outside `range` (viewed in
    /// `zone`) are ignored, so an unfiltered snapshot gives the same result
    /// as a pre-filtered one.
    #[must_use]
    pub fn build(input: &ReportInput<'_>, range: ReportRange, zone: &FixedOffset) -> Self {
        let orders: Vec<Order> = input
            .orders
            .iter()
            .filter(|order| range.contains(order.created_at, zone))
            .cloned()
            .collect();
        let items: Vec<OrderItem> = input
            .items
            .iter()
            .filter(|item| range.contains(item.created_at, zone))
            .cloned()
            .collect();

        let groupings = normalize(
            &ReportInput {
                orders: &orders,
                items: &items,
                ..*input
            },
            zone,
        );

        Self {
            range,
            metrics: SalesMetrics::compute(&orders, &groupings),
            daily: daily_series(&groupings),
            hourly: hourly_series(&groupings),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::{OrderId, OrderStatus, UserId};

    fn order(day: u32) -> Order {
        Order {
            id: OrderId::generate(),
            user_id: UserId::generate(),
            status: OrderStatus::Delivered,
            total: Decimal::from(25),
            created_at: Utc.with_ymd_and_hms(2024, 4, day, 9, 0, 0).unwrap(),
        }
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_rows_outside_range_are_ignored() {
        let orders = vec![order(1), order(10), order(20)];
        let input = ReportInput {
            orders: &orders,
            items: &[],
            products: &[],
            categories: &[],
        };
        let range = ReportRange::new(
            NaiveDate::from_ymd_opt(2024, 4, 5).unwrap(),
            NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
        )
        .unwrap();

        let report = AnalyticsReport::build(&input, range, &utc());
        assert_eq!(report.metrics.total_orders, 1);
        assert_eq!(report.daily.len(), 1);
        assert_eq!(report.hourly.len(), 24);
    }

    #[test]
    fn test_build_is_deterministic() {
        let orders = vec![order(1), order(2), order(2)];
        let input = ReportInput {
            orders: &orders,
            items: &[],
            products: &[],
            categories: &[],
        };
        let range = ReportRange::last_days(NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(), 30);
        assert_eq!(
            AnalyticsReport::build(&input, range, &utc()),
            AnalyticsReport::build(&input, range, &utc())
        );
    }
}
