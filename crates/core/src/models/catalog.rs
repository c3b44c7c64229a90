//! Catalog records joined against order items for category attribution.

use serde::{Deserialize, Serialize};

use crate::types::{CategoryId, ProductId};

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// Category the product is filed under, if any.
    pub category_id: Option<CategoryId>,
}

/// A product category (e.g. "Dairy", "Bakery").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}
