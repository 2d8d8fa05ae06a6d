//! Summary cards shown above the charts

use serde::Serialize;
use shared::models::{SupplierId, WarehouseId};

use super::shape::CURRENCY;
use super::{ChartContext, Scope};
use crate::analytics::{Aggregation, BucketKey, DateRange, Metric};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    /// Revenue for the platform, turnover for a supplier
    pub value: f64,
    pub value_metric: Metric,
    pub currency: &'static str,
    /// Valid orders in scope
    pub orders: usize,
    pub customers: usize,
    /// Refunded quantity
    pub returns: f64,
}

fn summarize(scope: &Scope, range: DateRange, ctx: &ChartContext) -> Summary {
    let metric = scope.value_metric();
    let filter = scope.filter(range);
    let totals = Aggregation::new(filter.clone(), BucketKey::Total, metric)
        .run(ctx.catalog, ctx.tz)
        .total();
    let returns = Aggregation::new(filter, BucketKey::Total, Metric::RefundedQuantity)
        .run(ctx.catalog, ctx.tz)
        .total_value();

    // the platform counts only customers present in the customer list
    let customers = if scope.is_supplier() {
        totals.customers().len()
    } else {
        totals
            .customers()
            .iter()
            .filter(|id| ctx.catalog.is_known_customer(**id))
            .count()
    };

    Summary {
        value: totals.value(metric),
        value_metric: metric,
        currency: CURRENCY,
        orders: totals.order_count(),
        customers,
        returns,
    }
}

/// Platform-wide cards, optionally for one warehouse
pub fn platform_summary(range: DateRange, warehouse: Option<WarehouseId>, ctx: &ChartContext) -> Summary {
    summarize(&Scope::platform().with_warehouse(warehouse), range, ctx)
}

/// Cards of one supplier's dashboard
pub fn supplier_summary(supplier: &SupplierId, range: DateRange, ctx: &ChartContext) -> Summary {
    summarize(&Scope::supplier(supplier.clone()), range, ctx)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Catalog;
    use crate::charts::fixtures;
    use chrono_tz::Africa::Tunis;

    #[test]
    fn test_platform_summary() {
        let mut snapshot = fixtures::snapshot();
        // customer 9 is missing from the customer list
        snapshot.orders.push(
            serde_json::from_str(
                r#"{"created_at": "2024-06-01", "state": "pending", "customer_id": 9,
                    "items": [{"product_id": 3, "qty_invoiced": 2}]}"#,
            )
            .unwrap(),
        );
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let summary = platform_summary(DateRange::all(), None, &ctx);
        assert_eq!(summary.value, 114.0);
        assert_eq!(summary.value_metric, Metric::Revenue);
        assert_eq!(summary.orders, 5);
        assert_eq!(summary.customers, 3);
        assert_eq!(summary.returns, 2.0);
    }

    #[test]
    fn test_supplier_summary() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let summary = supplier_summary(&SupplierId::from("8"), DateRange::all(), &ctx);
        // Semoule: 4 x 3 + 1 x 3
        assert_eq!(summary.value, 15.0);
        assert_eq!(summary.value_metric, Metric::Turnover);
        assert_eq!(summary.orders, 2);
        assert_eq!(summary.customers, 2);
        assert_eq!(summary.returns, 2.0);
    }

    #[test]
    fn test_warehouse_summary() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let summary = platform_summary(DateRange::all(), Some(2), &ctx);
        assert_eq!(summary.value, 22.0);
        assert_eq!(summary.orders, 2);
        assert_eq!(summary.customers, 2);
    }
}
