//! Order and order item records.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// A placed order, as snapshotted for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: OrderId,
    /// Customer who placed the order.
    pub user_id: UserId,
    /// Status at the time the batch was read.
    pub status: OrderStatus,
    /// Grand total charged (never negative).
    pub total: Decimal,
    /// When the order was placed.
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Whether this order counts towards revenue and customer metrics.
    #[must_use]
    pub const fn is_billable(&self) -> bool {
        !self.status.is_cancelled()
    }
}

/// A single line of an order.
///
/// `product_name` and `price` are captured at purchase time, so they stay
/// correct even after the catalog entry is renamed, repriced or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Line identifier.
    pub id: OrderItemId,
    /// Parent order.
    pub order_id: OrderId,
    /// Product purchased. May no longer exist in the catalog.
    pub product_id: ProductId,
    /// Product name at purchase time.
    pub product_name: String,
    /// Units purchased (always positive).
    pub quantity: u32,
    /// Unit price at purchase time.
    pub price: Decimal,
    /// When the line was created.
    pub created_at: DateTime<Utc>,
}

impl OrderItem {
    /// Unit price multiplied by quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = OrderItem {
            id: OrderItemId::generate(),
            order_id: OrderId::generate(),
            product_id: ProductId::generate(),
            product_name: "Bananas".to_string(),
            quantity: 3,
            price: Decimal::new(125, 2),
            created_at: Utc::now(),
        };
        assert_eq!(item.line_total(), Decimal::new(375, 2));
    }

    #[test]
    fn test_cancelled_order_is_not_billable() {
        let mut order = Order {
            id: OrderId::generate(),
            user_id: UserId::generate(),
            status: OrderStatus::Delivered,
            total: Decimal::ONE_HUNDRED,
            created_at: Utc::now(),
        };
        assert!(order.is_billable());
        order.status = OrderStatus::Cancelled;
        assert!(!order.is_billable());
    }
}
