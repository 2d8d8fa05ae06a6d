//! Product Model

use super::de;
use super::ids::{self, CategoryId, ProductId, SupplierId};
use serde::{Deserialize, Serialize};

/// Inventory figures embedded in a product record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StockItem {
    #[serde(default, deserialize_with = "de::number")]
    pub qty: f64,
    #[serde(default, deserialize_with = "de::flag")]
    pub is_in_stock: bool,
}

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    #[serde(alias = "id", deserialize_with = "de::id")]
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "de::null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "de::null_default")]
    pub sku: String,
    /// Owning supplier
    #[serde(default, deserialize_with = "ids::opt_supplier")]
    pub manufacturer: Option<SupplierId>,
    /// Selling price
    #[serde(default, deserialize_with = "de::number")]
    pub price: f64,
    /// Purchase cost (what the platform pays the supplier)
    #[serde(default, deserialize_with = "de::number")]
    pub cost: f64,
    #[serde(default, deserialize_with = "de::id_list")]
    pub category_ids: Vec<CategoryId>,
    #[serde(default)]
    pub stock_item: Option<StockItem>,
}

impl Product {
    /// Whether the product belongs to the given supplier
    pub fn is_supplied_by(&self, supplier: &SupplierId) -> bool {
        self.manufacturer.as_ref() == Some(supplier)
    }

    pub fn in_category(&self, category: CategoryId) -> bool {
        self.category_ids.contains(&category)
    }

    /// Current on-hand quantity from the embedded stock item
    pub fn stock_qty(&self) -> f64 {
        self.stock_item.as_ref().map(|s| s.qty).unwrap_or(0.0)
    }

    pub fn is_in_stock(&self) -> bool {
        self.stock_item.as_ref().is_some_and(|s| s.is_in_stock)
    }
}
