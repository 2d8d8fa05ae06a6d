//! Data snapshots
//!
//! A [`DataSnapshot`] is every upstream collection fetched together, held
//! read-only for as long as a dashboard view uses it.

use crate::{ClientResult, HttpClient};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{Category, Customer, Order, Product, ProductStock, Supplier, Warehouse};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// All upstream collections at one point in time
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataSnapshot {
    #[serde(default)]
    pub orders: Vec<Order>,
    /// Products, with `supplier_products` merged in
    #[serde(default)]
    pub products: Vec<Product>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub warehouses: Vec<Warehouse>,
    #[serde(default)]
    pub suppliers: Vec<Supplier>,
    #[serde(default)]
    pub products_stock: Vec<ProductStock>,
    #[serde(default)]
    pub fetched_at: DateTime<Utc>,
}

impl DataSnapshot {
    /// Add supplier-catalog products that the main product list lacks
    pub fn merge_supplier_products(&mut self, supplier_products: Vec<Product>) {
        let known: HashSet<_> = self.products.iter().map(|p| p.product_id).collect();
        self.products.extend(
            supplier_products
                .into_iter()
                .filter(|p| !known.contains(&p.product_id)),
        );
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty() && self.products.is_empty()
    }
}

/// Where snapshots come from
#[async_trait]
pub trait SnapshotSource: Send + Sync + 'static {
    async fn fetch_snapshot(&self) -> ClientResult<DataSnapshot>;
}

#[async_trait]
impl SnapshotSource for HttpClient {
    async fn fetch_snapshot(&self) -> ClientResult<DataSnapshot> {
        let started = std::time::Instant::now();
        let (
            orders,
            products,
            customers,
            categories,
            warehouses,
            suppliers,
            products_stock,
            supplier_products,
        ) = tokio::try_join!(
            self.orders(),
            self.products(),
            self.customers(),
            self.categories(),
            self.warehouses(),
            self.suppliers(),
            self.products_stock(),
            self.supplier_products(),
        )?;

        let mut snapshot = DataSnapshot {
            orders,
            products,
            customers,
            categories,
            warehouses,
            suppliers,
            products_stock,
            fetched_at: Utc::now(),
        };
        snapshot.merge_supplier_products(supplier_products);

        tracing::info!(
            orders = snapshot.orders.len(),
            products = snapshot.products.len(),
            customers = snapshot.customers.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Fetched upstream snapshot"
        );
        Ok(snapshot)
    }
}

/// Snapshot held in memory, or loaded from a JSON fixture file
#[derive(Debug, Clone)]
pub enum StaticSource {
    Memory(DataSnapshot),
    File(PathBuf),
}

impl StaticSource {
    pub fn from_file(path: impl AsRef<Path>) -> Self {
        Self::File(path.as_ref().to_path_buf())
    }
}

#[async_trait]
impl SnapshotSource for StaticSource {
    async fn fetch_snapshot(&self) -> ClientResult<DataSnapshot> {
        match self {
            Self::Memory(snapshot) => Ok(snapshot.clone()),
            Self::File(path) => {
                let bytes = tokio::fs::read(path).await?;
                let mut snapshot: DataSnapshot = serde_json::from_slice(&bytes)?;
                if snapshot.fetched_at == DateTime::<Utc>::default() {
                    snapshot.fetched_at = Utc::now();
                }
                Ok(snapshot)
            }
        }
    }
}
