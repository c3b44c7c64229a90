//! Chart-ready time series.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

use super::normalize::Groupings;

/// Revenue and order count for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyPoint {
    pub date: NaiveDate,
    pub revenue: Decimal,
    pub orders: u64,
}

/// Orders and revenue for one hour of the day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HourlyPoint {
    pub hour: u8,
    /// Axis label, e.g. `"9:00"`.
    pub label: String,
    pub orders: u64,
    pub revenue: Decimal,
}

/// One point per day that had at least one non-cancelled order, oldest first.
///
/// Days without orders are omitted, not zero-filled.
#[must_use]
pub fn daily_series(groupings: &Groupings) -> Vec<DailyPoint> {
    groupings
        .by_day
        .iter()
        .map(|(date, tally)| DailyPoint {
            date: *date,
            revenue: tally.revenue,
            orders: tally.orders,
        })
        .collect()
}

/// Exactly 24 points, hour 0 through 23.
#[must_use]
pub fn hourly_series(groupings: &Groupings) -> Vec<HourlyPoint> {
    (0u8..)
        .zip(groupings.by_hour.iter())
        .map(|(hour, tally)| HourlyPoint {
            hour,
            label: format!("{hour}:00"),
            orders: tally.count,
            revenue: tally.revenue,
        })
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use chrono::{FixedOffset, TimeZone, Utc};

    use super::*;
    use crate::analytics::normalize::{HOURS_PER_DAY, ReportInput, normalize};
    use crate::models::Order;
    use crate::types::{OrderId, OrderStatus, UserId};

    fn order(status: OrderStatus, day: u32) -> Order {
        Order {
            id: OrderId::generate(),
            user_id: UserId::generate(),
            status,
            total: Decimal::TEN,
            created_at: Utc.with_ymd_and_hms(2024, 2, day, 12, 0, 0).unwrap(),
        }
    }

    fn groupings(orders: &[Order]) -> Groupings {
        let input = ReportInput {
            orders,
            items: &[],
            products: &[],
            categories: &[],
        };
        normalize(&input, &FixedOffset::east_opt(0).unwrap())
    }

    #[test]
    fn test_hourly_series_always_has_24_points() {
        let empty = hourly_series(&groupings(&[]));
        assert_eq!(empty.len(), HOURS_PER_DAY);
        assert_eq!(empty[0].label, "0:00");
        assert_eq!(empty[23].label, "23:00");

        let busy = hourly_series(&groupings(&[order(OrderStatus::Placed, 1)]));
        assert_eq!(busy.len(), HOURS_PER_DAY);
        assert_eq!(busy[12].orders, 1);
    }

    #[test]
    fn test_daily_series_is_sparse_and_ascending() {
        let orders = vec![
            order(OrderStatus::Delivered, 9),
            order(OrderStatus::Delivered, 3),
            order(OrderStatus::Delivered, 3),
            // Only a cancelled order on the 5th: no point for that day.
            order(OrderStatus::Cancelled, 5),
        ];
        let series = daily_series(&groupings(&orders));

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].date, NaiveDate::from_ymd_opt(2024, 2, 3).unwrap());
        assert_eq!(series[0].orders, 2);
        assert_eq!(series[0].revenue, Decimal::from(20));
        assert_eq!(series[1].date, NaiveDate::from_ymd_opt(2024, 2, 9).unwrap());
    }
}
