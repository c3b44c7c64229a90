//! Sales and catalog reads for analytics.

use chrono::{DateTime, Utc};
use freshcart_core::analytics::ReportInput;
use freshcart_core::models::{Category, Order, OrderItem, Product};
use freshcart_core::{CategoryId, OrderId, OrderItemId, OrderStatus, ProductId, UserId};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use super::RepositoryError;

#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    user_id: UserId,
    status: OrderStatus,
    total: Decimal,
    created_at: DateTime<Utc>,
}

impl From<OrderRow> for Order {
    fn from(row: OrderRow) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            status: row.status,
            total: row.total,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OrderItemRow {
    id: OrderItemId,
    order_id: OrderId,
    product_id: ProductId,
    product_name: String,
    quantity: i32,
    price: Decimal,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderItemRow> for OrderItem {
    type Error = RepositoryError;

    fn try_from(row: OrderItemRow) -> Result<Self, Self::Error> {
        let quantity = u32::try_from(row.quantity)
            .ok()
            .filter(|&q| q > 0)
            .ok_or_else(|| {
                RepositoryError::DataCorruption(format!(
                    "order item {} has quantity {}",
                    row.id, row.quantity
                ))
            })?;

        Ok(Self {
            id: row.id,
            order_id: row.order_id,
            product_id: row.product_id,
            product_name: row.product_name,
            quantity,
            price: row.price,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: ProductId,
    name: String,
    category_id: Option<CategoryId>,
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
}

/// Every row an analytics report needs, owned.
#[derive(Debug, Default)]
pub struct ReportRows {
    pub orders: Vec<Order>,
    pub items: Vec<OrderItem>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

impl ReportRows {
    /// Borrow the rows as engine input.
    #[must_use]
    pub fn input(&self) -> ReportInput<'_> {
        ReportInput {
            orders: &self.orders,
            items: &self.items,
            products: &self.products,
            categories: &self.categories,
        }
    }
}

/// Load orders and items created in `[lower, upper)` plus the full catalog.
///
/// # Errors
///
/// Returns error if a query fails or an item row is invalid.
#[instrument(skip(pool))]
pub async fn load_report_rows(
    pool: &PgPool,
    lower: DateTime<Utc>,
    upper: DateTime<Utc>,
) -> Result<ReportRows, RepositoryError> {
    let orders = sqlx::query_as::<_, OrderRow>(
        r"
        SELECT id, user_id, status, total, created_at
        FROM orders
        WHERE created_at >= $1 AND created_at < $2
        ORDER BY created_at
        ",
    )
    .bind(lower)
    .bind(upper)
    .fetch_all(pool)
    .await?;

    let items = sqlx::query_as::<_, OrderItemRow>(
        r"
        SELECT id, order_id, product_id, product_name, quantity, price, created_at
        FROM order_items
        WHERE created_at >= $1 AND created_at < $2
        ORDER BY created_at
        ",
    )
    .bind(lower)
    .bind(upper)
    .fetch_all(pool)
    .await?;

    let products = sqlx::query_as::<_, ProductRow>("SELECT id, name, category_id FROM products")
        .fetch_all(pool)
        .await?;

    let categories = sqlx::query_as::<_, CategoryRow>("SELECT id, name FROM categories")
        .fetch_all(pool)
        .await?;

    tracing::debug!(
        orders = orders.len(),
        items = items.len(),
        products = products.len(),
        "Loaded report rows"
    );

    Ok(ReportRows {
        orders: orders.into_iter().map(Order::from).collect(),
        items: items
            .into_iter()
            .map(OrderItem::try_from)
            .collect::<Result<_, _>>()?,
        products: products
            .into_iter()
            .map(|row| Product {
                id: row.id,
                name: row.name,
                category_id: row.category_id,
            })
            .collect(),
        categories: categories
            .into_iter()
            .map(|row| Category {
                id: row.id,
                name: row.name,
            })
            .collect(),
    })
}
