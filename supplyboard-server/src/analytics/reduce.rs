//! Numeric reduction
//!
//! Sums are accumulated in `Decimal`; distinct counts keep the underlying
//! id sets so totals across buckets are taken over the union, never by
//! adding bucket counts.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::{CustomerId, OrderItem, Product};

use super::money::{self, line_amount, to_decimal, to_f64};
use crate::utils::{AppError, ErrorCode};

/// What a bucket measures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Σ qty_invoiced
    Quantity,
    /// Σ qty x price
    Revenue,
    /// Σ qty x cost
    Turnover,
    /// Σ row_total_incl_tax
    RowRevenue,
    /// Σ amount_refunded
    RefundAmount,
    /// Σ qty_refunded
    RefundedQuantity,
    /// |customers|
    DistinctCustomers,
    /// |orders|
    OrderCount,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Quantity => "quantity",
            Self::Revenue => "revenue",
            Self::Turnover => "turnover",
            Self::RowRevenue => "row_revenue",
            Self::RefundAmount => "refund_amount",
            Self::RefundedQuantity => "refunded_quantity",
            Self::DistinctCustomers => "distinct_customers",
            Self::OrderCount => "order_count",
        }
    }

    /// Contribution of one line item; zero for counting metrics
    pub fn item_value(&self, item: &OrderItem, product: Option<&Product>) -> Decimal {
        match self {
            Self::Quantity => to_decimal(item.qty_invoiced),
            Self::Revenue => product.map_or(Decimal::ZERO, |p| line_amount(item.qty_invoiced, p.price)),
            Self::Turnover => product.map_or(Decimal::ZERO, |p| line_amount(item.qty_invoiced, p.cost)),
            Self::RowRevenue => to_decimal(item.row_total_incl_tax),
            Self::RefundAmount => to_decimal(item.amount_refunded),
            Self::RefundedQuantity => to_decimal(item.qty_refunded),
            Self::DistinctCustomers | Self::OrderCount => Decimal::ZERO,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "quantity" | "qty" | "volume" => Ok(Self::Quantity),
            "revenue" => Ok(Self::Revenue),
            "turnover" => Ok(Self::Turnover),
            "row_revenue" | "row_total" => Ok(Self::RowRevenue),
            "refund_amount" | "refunds" => Ok(Self::RefundAmount),
            "refunded_quantity" | "returns" => Ok(Self::RefundedQuantity),
            "distinct_customers" | "customers" => Ok(Self::DistinctCustomers),
            "order_count" | "orders" => Ok(Self::OrderCount),
            other => Err(AppError::with_message(
                ErrorCode::InvalidMetric,
                format!("Unknown metric: {}", other),
            )),
        }
    }
}

/// Running totals of one bucket
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Accumulator {
    sum: Decimal,
    customers: BTreeSet<CustomerId>,
    orders: BTreeSet<usize>,
}

impl Accumulator {
    pub fn add(&mut self, value: Decimal) {
        self.sum = money::add(self.sum, value);
    }

    /// Record an order (by snapshot position) and its customer
    pub fn touch(&mut self, order_index: usize, customer: Option<CustomerId>) {
        self.orders.insert(order_index);
        if let Some(customer) = customer {
            self.customers.insert(customer);
        }
    }

    pub fn merge(&mut self, other: &Accumulator) {
        self.sum = money::add(self.sum, other.sum);
        self.customers.extend(other.customers.iter().copied());
        self.orders.extend(other.orders.iter().copied());
    }

    pub fn sum(&self) -> Decimal {
        self.sum
    }

    pub fn customers(&self) -> &BTreeSet<CustomerId> {
        &self.customers
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    /// Value of the bucket under `metric`
    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::DistinctCustomers => self.customers.len() as f64,
            Metric::OrderCount => self.orders.len() as f64,
            _ => to_f64(self.sum),
        }
    }
}
