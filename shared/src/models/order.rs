//! Order Model

use super::de;
use super::ids::{CustomerId, ProductId, WarehouseId};
use super::timestamp::{self, Timestamp};
use serde::{Deserialize, Serialize};

/// Order lifecycle state
///
/// Only `canceled` and `complete` carry meaning for analytics; every other
/// value is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum OrderState {
    Complete,
    Canceled,
    Delivered,
    Processing,
    Pending,
    Other(String),
}

impl OrderState {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Complete => "complete",
            Self::Canceled => "canceled",
            Self::Delivered => "delivered",
            Self::Processing => "processing",
            Self::Pending => "pending",
            Self::Other(s) => s,
        }
    }

    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }
}

impl Default for OrderState {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<String> for OrderState {
    fn from(value: String) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "complete" => Self::Complete,
            "canceled" | "cancelled" => Self::Canceled,
            "delivered" => Self::Delivered,
            "processing" => Self::Processing,
            "pending" => Self::Pending,
            _ => Self::Other(value),
        }
    }
}

impl From<OrderState> for String {
    fn from(value: OrderState) -> Self {
        value.as_str().to_string()
    }
}

/// Order line item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(deserialize_with = "de::id")]
    pub product_id: ProductId,
    #[serde(default, deserialize_with = "de::opt_text")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::number")]
    pub qty_invoiced: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub qty_refunded: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub amount_refunded: f64,
    #[serde(default, deserialize_with = "de::number")]
    pub row_total_incl_tax: f64,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(default, alias = "order_id", alias = "entity_id", deserialize_with = "de::opt_id")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "timestamp::opt_timestamp")]
    pub created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub state: OrderState,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub store_id: Option<WarehouseId>,
    #[serde(default, deserialize_with = "de::opt_id")]
    pub customer_id: Option<CustomerId>,
    #[serde(default, deserialize_with = "de::null_default")]
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Creation time; orders without one sort as the Unix epoch
    pub fn created_or_epoch(&self) -> Timestamp {
        self.created_at.unwrap_or(Timestamp::EPOCH)
    }
}
