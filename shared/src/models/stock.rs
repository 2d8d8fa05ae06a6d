//! Per-warehouse stock (upstream `products_stock`)

use super::de;
use super::ids::{ProductId, WarehouseId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockEntry {
    #[serde(deserialize_with = "de::id")]
    pub store_id: WarehouseId,
    #[serde(default, deserialize_with = "de::number")]
    pub quantity: f64,
}

/// Current (not historical) quantity of a product per warehouse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductStock {
    #[serde(deserialize_with = "de::id")]
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "de::null_default")]
    pub stock: Vec<StockEntry>,
}

impl ProductStock {
    /// Quantity held in one warehouse
    pub fn quantity_in(&self, warehouse: WarehouseId) -> Option<f64> {
        self.stock
            .iter()
            .find(|entry| entry.store_id == warehouse)
            .map(|entry| entry.quantity)
    }

    /// Quantity summed over all warehouses
    pub fn total_quantity(&self) -> f64 {
        self.stock.iter().map(|entry| entry.quantity).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quantities() {
        let stock: ProductStock = serde_json::from_str(
            r#"{"product_id": 9, "stock": [{"store_id": 1, "quantity": 5}, {"store_id": "2", "quantity": "7"}]}"#,
        )
        .unwrap();

        assert_eq!(stock.quantity_in(2), Some(7.0));
        assert_eq!(stock.quantity_in(3), None);
        assert_eq!(stock.total_quantity(), 12.0);
    }
}
