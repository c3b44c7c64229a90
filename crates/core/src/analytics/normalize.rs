//! Groups raw order and order-item rows into running tallies.
//!
//! Every downstream metric and chart series is derived from the [`Groupings`]
//! produced here, so this is the only place that walks the raw rows.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{FixedOffset, NaiveDate, Timelike};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};

use crate::models::{Category, Order, OrderItem, Product};
use crate::types::{CategoryId, OrderId, ProductId};

/// Number of hour-of-day buckets.
pub const HOURS_PER_DAY: usize = 24;

/// Borrowed batch of rows for one report.
///
/// All slices are expected to be pre-filtered to the report range by the
/// caller. Nothing here is mutated.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub orders: &'a [Order],
    pub items: &'a [OrderItem],
    pub products: &'a [Product],
    pub categories: &'a [Category],
}

/// Key for category attribution.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CategoryKey {
    /// A category resolved through the product catalog.
    Named(String),
    /// The product, or its category, no longer exists in the catalog.
    Uncategorized,
}

impl CategoryKey {
    /// Label shown for items that could not be attributed.
    pub const UNCATEGORIZED_LABEL: &'static str = "Uncategorized";

    /// Display label for the bucket.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Named(name) => name,
            Self::Uncategorized => Self::UNCATEGORIZED_LABEL,
        }
    }
}

impl Serialize for CategoryKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Running totals for one category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryTally {
    pub revenue: Decimal,
    pub quantity: u64,
}

/// Running totals for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductSales {
    pub product_id: ProductId,
    /// Name from the first order item seen for this product.
    pub name: String,
    pub quantity: u64,
    pub revenue: Decimal,
}

/// Orders placed within one hour of the day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HourTally {
    pub count: u64,
    pub revenue: Decimal,
}

/// Orders placed on one calendar day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DayTally {
    pub revenue: Decimal,
    pub orders: u64,
}

/// Intermediate tallies keyed by category, product, hour and day.
///
/// Ordered maps keep iteration (and therefore every derived output)
/// identical across invocations on the same input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Groupings {
    pub by_category: BTreeMap<CategoryKey, CategoryTally>,
    pub by_product: BTreeMap<ProductId, ProductSales>,
    pub by_hour: [HourTally; HOURS_PER_DAY],
    pub by_day: BTreeMap<NaiveDate, DayTally>,
}

impl Default for Groupings {
    fn default() -> Self {
        Self {
            by_category: BTreeMap::new(),
            by_product: BTreeMap::new(),
            by_hour: [HourTally::default(); HOURS_PER_DAY],
            by_day: BTreeMap::new(),
        }
    }
}

/// Product → category-name lookup built from the catalog slices.
struct CatalogIndex<'a> {
    product_category: HashMap<ProductId, Option<CategoryId>>,
    category_names: HashMap<CategoryId, &'a str>,
}

impl<'a> CatalogIndex<'a> {
    fn new(products: &[Product], categories: &'a [Category]) -> Self {
        Self {
            product_category: products.iter().map(|p| (p.id, p.category_id)).collect(),
            category_names: categories
                .iter()
                .map(|c| (c.id, c.name.as_str()))
                .collect(),
        }
    }

    fn category_of(&self, product_id: ProductId) -> CategoryKey {
        self.product_category
            .get(&product_id)
            .copied()
            .flatten()
            .and_then(|category_id| self.category_names.get(&category_id))
            .map_or(CategoryKey::Uncategorized, |name| {
                CategoryKey::Named((*name).to_owned())
            })
    }
}

/// Build all four groupings for a batch.
///
/// - Cancelled orders are left out of the hourly and daily tallies.
/// - Items belonging to a cancelled order in the batch are left out of the
///   category and product tallies. Items whose order is not in the batch are
///   kept.
/// - Item revenue is `price × quantity`, not the order total, so an order that
///   spans several categories is split correctly.
/// - Hours and days are taken from `created_at` viewed in `zone`.
#[must_use]
pub fn normalize(input: &ReportInput<'_>, zone: &FixedOffset) -> Groupings {
    let mut groupings = Groupings::default();

    let cancelled: HashSet<OrderId> = input
        .orders
        .iter()
        .filter(|order| order.status.is_cancelled())
        .map(|order| order.id)
        .collect();

    for order in input.orders.iter().filter(|order| order.is_billable()) {
        let local = order.created_at.with_timezone(zone);

        let hour = local.hour() as usize;
        if let Some(bucket) = groupings.by_hour.get_mut(hour) {
            bucket.count += 1;
            bucket.revenue += order.total;
        }

        let day = groupings.by_day.entry(local.date_naive()).or_default();
        day.revenue += order.total;
        day.orders += 1;
    }

    let catalog = CatalogIndex::new(input.products, input.categories);

    for item in input
        .items
        .iter()
        .filter(|item| !cancelled.contains(&item.order_id))
    {
        let line_total = item.line_total();
        let quantity = u64::from(item.quantity);

        let category = groupings
            .by_category
            .entry(catalog.category_of(item.product_id))
            .or_default();
        category.revenue += line_total;
        category.quantity += quantity;

        let product = groupings
            .by_product
            .entry(item.product_id)
            .or_insert_with(|| ProductSales {
                product_id: item.product_id,
                name: item.product_name.clone(),
                quantity: 0,
                revenue: Decimal::ZERO,
            });
        product.quantity += quantity;
        product.revenue += line_total;
    }

    groupings
}
