//! Scalar KPIs derived from an order batch and its groupings.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;

use super::normalize::{CategoryKey, Groupings, ProductSales};
use crate::models::Order;
use crate::types::{OrderStatus, UserId};

/// Maximum number of entries in [`SalesMetrics::top_products`].
pub const TOP_PRODUCTS_LIMIT: usize = 10;

/// `numerator / denominator × 100`, or `0.0` when the denominator is zero.
///
/// Every ratio in the dashboard goes through here so that an empty batch
/// renders as zeros rather than NaN.
#[must_use]
// Order counts will never exceed u64's f64-safe range (2^52)
#[allow(clippy::cast_precision_loss)]
pub fn percent(numerator: u64, denominator: u64) -> f64 {
    if denominator == 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64 * 100.0
}

/// Revenue and volume for one category bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySales {
    pub category: CategoryKey,
    pub revenue: Decimal,
    pub quantity: u64,
}

/// Order count and share for one status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusShare {
    pub status: OrderStatus,
    pub count: u64,
    /// Percentage of all orders, cancelled included.
    pub rate: f64,
}

/// Business KPIs for one report range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesMetrics {
    /// Sum of order totals, cancelled orders excluded.
    pub total_revenue: Decimal,
    /// Number of non-cancelled orders.
    pub total_orders: u64,
    /// `total_revenue / total_orders`, zero when there are no orders.
    pub avg_order_value: Decimal,
    /// Distinct customers who placed an order in the range.
    pub unique_customers: u64,
    /// Customers with more than one non-cancelled order in the range.
    pub repeat_customers: u64,
    /// `repeat / unique × 100` to one decimal place.
    pub retention_rate: String,
    /// Delivered orders as a percentage of all orders.
    pub delivery_rate: f64,
    /// Cancelled orders as a percentage of all orders.
    pub cancel_rate: f64,
    /// Per-status counts over all orders, in lifecycle order.
    pub status_breakdown: Vec<StatusShare>,
    /// Hour of day (0-23) with the most orders. Earliest hour wins ties.
    pub peak_hour: u8,
    /// Best sellers by quantity, at most [`TOP_PRODUCTS_LIMIT`].
    pub top_products: Vec<ProductSales>,
    /// Categories by revenue, highest first.
    pub category_sales: Vec<CategorySales>,
}

impl SalesMetrics {
    /// Compute every KPI for `orders` and the matching `groupings`.
    ///
    /// `orders` must be the same batch the groupings were built from,
    /// cancelled orders included.
    #[must_use]
    pub fn compute(orders: &[Order], groupings: &Groupings) -> Self {
        let billable: Vec<&Order> = orders.iter().filter(|o| o.is_billable()).collect();

        let total_revenue: Decimal = billable.iter().map(|o| o.total).sum();
        let total_orders = billable.len() as u64;
        let avg_order_value = if total_orders == 0 {
            Decimal::ZERO
        } else {
            total_revenue / Decimal::from(total_orders)
        };

        // Anyone who ordered is a customer; only billable orders make a repeat.
        let unique_customers = orders
            .iter()
            .map(|o| o.user_id)
            .collect::<HashSet<UserId>>()
            .len() as u64;
        let mut orders_per_customer: HashMap<UserId, u64> = HashMap::new();
        for order in &billable {
            *orders_per_customer.entry(order.user_id).or_default() += 1;
        }
        let repeat_customers = orders_per_customer.values().filter(|&&n| n > 1).count() as u64;
        let retention_rate = format!("{:.1}", percent(repeat_customers, unique_customers));

        let all_orders = orders.len() as u64;
        let status_breakdown: Vec<StatusShare> = OrderStatus::ALL
            .into_iter()
            .map(|status| {
                let count = orders.iter().filter(|o| o.status == status).count() as u64;
                StatusShare {
                    status,
                    count,
                    rate: percent(count, all_orders),
                }
            })
            .collect();
        let rate_of = |status: OrderStatus| {
            status_breakdown
                .iter()
                .find(|share| share.status == status)
                .map_or(0.0, |share| share.rate)
        };
        let delivery_rate = rate_of(OrderStatus::Delivered);
        let cancel_rate = rate_of(OrderStatus::Cancelled);

        Self {
            total_revenue,
            total_orders,
            avg_order_value,
            unique_customers,
            repeat_customers,
            retention_rate,
            delivery_rate,
            cancel_rate,
            status_breakdown,
            peak_hour: peak_hour(groupings),
            top_products: top_products(groupings),
            category_sales: category_sales(groupings),
        }
    }
}

/// Left-to-right scan over hours 0..23 that only moves on a strictly greater
/// count, so the earliest hour wins a tie and an empty day reports hour 0.
fn peak_hour(groupings: &Groupings) -> u8 {
    let (hour, _) = (0u8..)
        .zip(groupings.by_hour.iter())
        .fold((0u8, 0u64), |max, (hour, tally)| {
            if tally.count > max.1 {
                (hour, tally.count)
            } else {
                max
            }
        });
    hour
}

fn top_products(groupings: &Groupings) -> Vec<ProductSales> {
    let mut products: Vec<ProductSales> = groupings.by_product.values().cloned().collect();
    products.sort_by(|a, b| b.quantity.cmp(&a.quantity));
    products.truncate(TOP_PRODUCTS_LIMIT);
    products
}

fn category_sales(groupings: &Groupings) -> Vec<CategorySales> {
    let mut categories: Vec<CategorySales> = groupings
        .by_category
        .iter()
        .map(|(category, tally)| CategorySales {
            category: category.clone(),
            revenue: tally.revenue,
            quantity: tally.quantity,
        })
        .collect();
    categories.sort_by(|a, b| b.revenue.cmp(&a.revenue));
    categories
}
