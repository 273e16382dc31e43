//! Product Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Preparation area a product is routed to when kitchen tickets
/// are dispatched. `None` items never appear on a ticket.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrepArea {
    Kitchen,
    Bar,
    #[default]
    None,
}

/// Product status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProductStatus {
    #[default]
    Active,
    Inactive,
}

/// Product entity (菜品/商品)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    /// Unit price; copied onto order lines at add time.
    pub price: Decimal,
    /// On-hand quantity. Informational only, not decremented by orders.
    pub stock: i32,
    pub prep_area: PrepArea,
    pub status: ProductStatus,
}

impl Product {
    pub fn is_sellable(&self) -> bool {
        self.status == ProductStatus::Active
    }
}
