//! Identifier types

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Product id (upstream `product_id`)
pub type ProductId = i64;
/// Customer id
pub type CustomerId = i64;
/// Warehouse / store id (`store_id` on orders and stock rows)
pub type WarehouseId = i64;
/// Category id
pub type CategoryId = i64;

/// Supplier identity as carried by `Product.manufacturer`
///
/// Upstream sends it as a number on suppliers and as a string on products,
/// so it is normalized to its text form and compared as such.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SupplierId(String);

impl SupplierId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SupplierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SupplierId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<i64> for SupplierId {
    fn from(value: i64) -> Self {
        Self(value.to_string())
    }
}

impl<'de> Deserialize<'de> for SupplierId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        super::de::opt_text(deserializer)?
            .map(SupplierId)
            .ok_or_else(|| serde::de::Error::custom("empty supplier id"))
    }
}

/// Optional supplier id; empty values become `None`
pub fn opt_supplier<'de, D>(deserializer: D) -> Result<Option<SupplierId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(super::de::opt_text(deserializer)?.map(SupplierId))
}
