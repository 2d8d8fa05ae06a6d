//! Aggregation pipeline
//!
//! filter -> bucket -> reduce over a snapshot. Every chart is an
//! [`Aggregation`] with its own filter, key and metric.

use std::collections::{BTreeMap, BTreeSet};

use chrono_tz::Tz;
use shared::models::CustomerId;

use super::bucket::BucketKey;
use super::catalog::Catalog;
use super::filter::OrderFilter;
use super::money;
use super::reduce::{Accumulator, Metric};

/// One parametrized aggregation
#[derive(Debug, Clone)]
pub struct Aggregation {
    pub filter: OrderFilter,
    pub key: BucketKey,
    pub metric: Metric,
}

impl Aggregation {
    pub fn new(filter: OrderFilter, key: BucketKey, metric: Metric) -> Self {
        Self {
            filter,
            key,
            metric,
        }
    }

    pub fn run(&self, catalog: &Catalog, tz: Tz) -> Buckets {
        let compiled = self.filter.compile(tz);
        let mut buckets: BTreeMap<String, Accumulator> = BTreeMap::new();

        for (index, order) in catalog.snapshot().orders.iter().enumerate() {
            if !compiled.matches_order(order, catalog) {
                continue;
            }
            let local_date = order.created_or_epoch().in_tz(tz).date_naive();
            let items = order
                .items
                .iter()
                .filter(|item| compiled.matches_item(item, catalog));

            match self.key.order_keys(order, local_date, catalog) {
                Some(keys) => {
                    if keys.is_empty() {
                        continue;
                    }
                    let value = money::sum(
                        items.map(|item| self.metric.item_value(item, catalog.product(item.product_id))),
                    );
                    for key in keys {
                        let acc = buckets.entry(key).or_default();
                        acc.touch(index, order.customer_id);
                        acc.add(value);
                    }
                }
                None => {
                    for item in items {
                        let value = self.metric.item_value(item, catalog.product(item.product_id));
                        for key in self.key.item_keys(item, catalog) {
                            let acc = buckets.entry(key).or_default();
                            acc.touch(index, order.customer_id);
                            acc.add(value);
                        }
                    }
                }
            }
        }

        Buckets {
            metric: self.metric,
            map: buckets,
        }
    }
}

/// Result of an [`Aggregation`], keyed and sorted by bucket label
#[derive(Debug, Clone)]
pub struct Buckets {
    metric: Metric,
    map: BTreeMap<String, Accumulator>,
}

impl Buckets {
    pub fn metric(&self) -> Metric {
        self.metric
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn get(&self, key: &str) -> Option<&Accumulator> {
        self.map.get(key)
    }

    pub fn value(&self, key: &str) -> f64 {
        self.map.get(key).map_or(0.0, |acc| acc.value(self.metric))
    }

    /// Sorted bucket labels
    pub fn labels(&self) -> Vec<String> {
        self.map.keys().cloned().collect()
    }

    /// Bucket values in label order
    pub fn values(&self) -> Vec<f64> {
        self.map.values().map(|acc| acc.value(self.metric)).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Accumulator)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// `(label, value)` pairs in label order
    pub fn pairs(&self) -> Vec<(String, f64)> {
        self.map
            .iter()
            .map(|(k, acc)| (k.clone(), acc.value(self.metric)))
            .collect()
    }

    /// Keep only buckets whose value satisfies `keep`
    pub fn retain(mut self, keep: impl Fn(f64) -> bool) -> Self {
        let metric = self.metric;
        self.map.retain(|_, acc| keep(acc.value(metric)));
        self
    }

    /// All buckets merged; distinct counts are unions
    pub fn total(&self) -> Accumulator {
        let mut total = Accumulator::default();
        for acc in self.map.values() {
            total.merge(acc);
        }
        total
    }

    pub fn total_value(&self) -> f64 {
        self.total().value(self.metric)
    }

    /// Union of all bucket customer sets
    pub fn customers(&self) -> BTreeSet<CustomerId> {
        self.map
            .values()
            .flat_map(|acc| acc.customers().iter().copied())
            .collect()
    }
}
