//! Lookup records: categories, warehouses, suppliers

use super::de;
use super::ids::{CategoryId, SupplierId, WarehouseId};
use serde::{Deserialize, Serialize};

/// Category entity (upstream `{categoryId, nameCategory}`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    #[serde(alias = "categoryId", alias = "category_id", deserialize_with = "de::id")]
    pub id: CategoryId,
    #[serde(alias = "nameCategory", default, deserialize_with = "de::null_default")]
    pub name: String,
}

/// Warehouse (store) entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Warehouse {
    #[serde(alias = "store_id", deserialize_with = "de::id")]
    pub id: WarehouseId,
    #[serde(default, deserialize_with = "de::null_default")]
    pub name: String,
}

/// Supplier entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    #[serde(alias = "manufacturerId", alias = "manufacturer")]
    pub manufacturer_id: SupplierId,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub contact_name: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub country: Option<String>,
}

impl Supplier {
    /// Display name, falling back to the id
    pub fn display_name(&self) -> String {
        self.company_name
            .clone()
            .unwrap_or_else(|| format!("Supplier {}", self.manufacturer_id))
    }
}
