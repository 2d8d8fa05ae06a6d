//! Snapshot lookup index
//!
//! Upstream collections are plain arrays; charts need id lookups across
//! them. [`Catalog`] borrows a snapshot and indexes it once per request.

use std::collections::HashMap;

use shared::models::{
    CategoryId, Customer, CustomerId, Product, ProductId, ProductStock, Supplier, SupplierId,
    WarehouseId,
};
use supplyboard_client::DataSnapshot;

#[derive(Debug)]
pub struct Catalog<'a> {
    snapshot: &'a DataSnapshot,
    products: HashMap<ProductId, &'a Product>,
    customers: HashMap<CustomerId, &'a Customer>,
    categories: HashMap<CategoryId, &'a str>,
    stock: HashMap<ProductId, &'a ProductStock>,
}

impl<'a> Catalog<'a> {
    pub fn new(snapshot: &'a DataSnapshot) -> Self {
        // first occurrence wins on duplicate ids
        let mut products = HashMap::with_capacity(snapshot.products.len());
        for product in &snapshot.products {
            products.entry(product.product_id).or_insert(product);
        }
        let mut customers = HashMap::with_capacity(snapshot.customers.len());
        for customer in &snapshot.customers {
            customers.entry(customer.id).or_insert(customer);
        }
        let mut categories = HashMap::with_capacity(snapshot.categories.len());
        for category in &snapshot.categories {
            categories.entry(category.id).or_insert(category.name.as_str());
        }
        let mut stock = HashMap::with_capacity(snapshot.products_stock.len());
        for entry in &snapshot.products_stock {
            stock.entry(entry.product_id).or_insert(entry);
        }

        Self {
            snapshot,
            products,
            customers,
            categories,
            stock,
        }
    }

    pub fn snapshot(&self) -> &'a DataSnapshot {
        self.snapshot
    }

    pub fn product(&self, id: ProductId) -> Option<&'a Product> {
        self.products.get(&id).copied()
    }

    pub fn customer(&self, id: CustomerId) -> Option<&'a Customer> {
        self.customers.get(&id).copied()
    }

    pub fn is_known_customer(&self, id: CustomerId) -> bool {
        self.customers.contains_key(&id)
    }

    pub fn category_name(&self, id: CategoryId) -> Option<&'a str> {
        self.categories.get(&id).copied()
    }

    pub fn stock(&self, product: ProductId) -> Option<&'a ProductStock> {
        self.stock.get(&product).copied()
    }

    pub fn warehouse_exists(&self, id: WarehouseId) -> bool {
        self.snapshot.warehouses.iter().any(|w| w.id == id)
    }

    pub fn supplier(&self, id: &SupplierId) -> Option<&'a Supplier> {
        self.snapshot
            .suppliers
            .iter()
            .find(|s| &s.manufacturer_id == id)
    }

    /// Whether the product is manufactured by `supplier`
    pub fn is_supplied_by(&self, product: ProductId, supplier: &SupplierId) -> bool {
        self.product(product)
            .is_some_and(|p| p.is_supplied_by(supplier))
    }

    /// Products manufactured by `supplier`, in snapshot order
    pub fn products_of<'s>(
        &self,
        supplier: &'s SupplierId,
    ) -> impl Iterator<Item = &'a Product> + 's
    where
        'a: 's,
    {
        self.snapshot
            .products
            .iter()
            .filter(move |p| p.is_supplied_by(supplier))
    }
}
