//! Inventory trend
//!
//! Stock history is not stored upstream, it is rebuilt from the current
//! quantity and the sales of complete orders. Points are `(epoch millis,
//! quantity)`; the last point of every series is the snapshot time.

use std::collections::HashMap;

use shared::models::{Product, ProductId, SupplierId, WarehouseId};

use super::shape::{Chart, ChartResponse, ChartType, Point, Series};
use super::{ChartContext, ChartKind, ChartRequest};
use crate::analytics::OrderFilter;
use crate::utils::{AppError, AppResult, ErrorCode};

/// Sales per product as `(millis, qty)`, oldest first
fn sales_by_product(filter: &OrderFilter, ctx: &ChartContext) -> HashMap<ProductId, Vec<(i64, f64)>> {
    let compiled = filter.compile(ctx.tz);
    let mut sales: HashMap<ProductId, Vec<(i64, f64)>> = HashMap::new();

    for order in &ctx.catalog.snapshot().orders {
        if !compiled.matches_order(order, ctx.catalog) {
            continue;
        }
        let at = order.created_or_epoch().millis(ctx.tz);
        for item in order.items.iter().filter(|i| compiled.matches_item(i, ctx.catalog)) {
            sales
                .entry(item.product_id)
                .or_default()
                .push((at, item.qty_invoiced.max(0.0)));
        }
    }
    for history in sales.values_mut() {
        history.sort_by_key(|(at, _)| *at);
    }
    sales
}

/// Stock level before each sale, walking back from the current quantity
pub fn rebuild_backward(current: f64, sales: &[(i64, f64)], now_ms: i64) -> Vec<Point> {
    let mut inventory = current;
    let mut points: Vec<Point> = sales
        .iter()
        .rev()
        .map(|(at, qty)| {
            inventory += qty;
            Point { x: *at, y: inventory }
        })
        .collect();
    points.reverse();
    points.push(Point { x: now_ms, y: current });
    points
}

/// Stock level after each sale, walking forward from the current quantity
///
/// Levels never drop below zero.
pub fn walk_forward(current: f64, sales: &[(i64, f64)], now_ms: i64) -> Vec<Point> {
    let mut inventory = current;
    let mut points: Vec<Point> = sales
        .iter()
        .map(|(at, qty)| {
            inventory -= qty;
            Point {
                x: *at,
                y: inventory.max(0.0),
            }
        })
        .collect();
    points.push(Point {
        x: now_ms,
        y: current.max(0.0),
    });
    points
}

fn in_category(product: &Product, request: &ChartRequest) -> bool {
    request.category.is_none_or(|c| product.in_category(c))
}

fn supplier_series(request: &ChartRequest, ctx: &ChartContext, supplier: &SupplierId) -> Vec<Series> {
    let sales = sales_by_product(&request.filter().complete_only(), ctx);
    ctx.catalog
        .products_of(supplier)
        .filter(|p| p.is_in_stock() && in_category(p, request))
        .map(|p| {
            let history = sales.get(&p.product_id).map(Vec::as_slice).unwrap_or(&[]);
            Series::points(
                p.name.clone(),
                rebuild_backward(p.stock_qty(), history, ctx.now_ms),
            )
        })
        .collect()
}

fn warehouse_series(request: &ChartRequest, ctx: &ChartContext, warehouse: WarehouseId) -> Vec<Series> {
    let sales = sales_by_product(&request.filter().complete_only(), ctx);
    ctx.catalog
        .snapshot()
        .products_stock
        .iter()
        .filter_map(|entry| {
            let quantity = entry.quantity_in(warehouse).filter(|q| *q > 0.0)?;
            let product = ctx.catalog.product(entry.product_id);
            if request.category.is_some() && !product.is_some_and(|p| in_category(p, request)) {
                return None;
            }
            let name = product
                .map(|p| p.name.clone())
                .unwrap_or_else(|| format!("Produit {}", entry.product_id));
            let history = sales.get(&entry.product_id).map(Vec::as_slice).unwrap_or(&[]);
            Some(Series::points(
                name,
                walk_forward(quantity, history, ctx.now_ms),
            ))
        })
        .collect()
}

/// Stock level over time, one series per product
///
/// The platform view needs a warehouse; a supplier view follows the
/// supplier's own stock.
pub fn inventory_trend(request: &ChartRequest, ctx: &ChartContext) -> AppResult<ChartResponse> {
    let series = match (&request.scope.supplier, request.scope.warehouse) {
        (Some(supplier), _) => supplier_series(request, ctx, supplier),
        (None, Some(warehouse)) => warehouse_series(request, ctx, warehouse),
        (None, None) => {
            return Err(AppError::with_message(
                ErrorCode::WarehouseRequired,
                "Sélectionnez un entrepôt pour afficher l'évolution du stock",
            ));
        }
    };

    if series.is_empty() {
        return Ok(ChartResponse::no_data(
            ChartKind::InventoryTrend,
            "Aucun produit en stock",
        ));
    }

    let count = series.len();
    let chart = series
        .into_iter()
        .fold(
            Chart::new(ChartKind::InventoryTrend, ChartType::Line, "Évolution du stock"),
            Chart::with_series,
        )
        .x_title("Date")
        .y_title("Quantité en stock")
        .meta("products", count);
    Ok(chart.ready())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Catalog;
    use crate::charts::shape::SeriesData;
    use crate::charts::{Scope, fixtures};
    use chrono_tz::Africa::Tunis;

    fn ys(series: &Series) -> Vec<f64> {
        match &series.data {
            SeriesData::Points(points) => points.iter().map(|p| p.y).collect(),
            SeriesData::Values(_) => panic!("expected points"),
        }
    }

    #[test]
    fn test_rebuild_backward() {
        let points = rebuild_backward(20.0, &[(1, 5.0), (2, 2.0)], 9);
        assert_eq!(
            points,
            vec![
                Point { x: 1, y: 27.0 },
                Point { x: 2, y: 22.0 },
                Point { x: 9, y: 20.0 }
            ]
        );
    }

    #[test]
    fn test_walk_forward_clamps_at_zero() {
        let points = walk_forward(3.0, &[(1, 2.0), (2, 4.0)], 9);
        assert_eq!(points.iter().map(|p| p.y).collect::<Vec<_>>(), vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn test_supplier_inventory() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let response = inventory_trend(&ChartRequest::new(Scope::supplier("7".into())), &ctx).unwrap();
        let chart = response.chart().unwrap();
        // Pates only sold in a processing order, so it has no history
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].name, "Huile");
        assert_eq!(ys(&chart.series[0]), vec![27.0, 22.0, 20.0]);
        assert_eq!(ys(&chart.series[1]), vec![8.0]);
    }

    #[test]
    fn test_platform_requires_warehouse() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let err = inventory_trend(&ChartRequest::new(Scope::platform()), &ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::WarehouseRequired);
    }

    #[test]
    fn test_warehouse_inventory() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let request = ChartRequest::new(Scope::platform().with_warehouse(Some(1)));
        let response = inventory_trend(&request, &ctx).unwrap();
        let chart = response.chart().unwrap();
        // Semoule has no stock in warehouse 1
        assert_eq!(chart.series.len(), 1);
        assert_eq!(ys(&chart.series[0]), vec![7.0, 5.0, 12.0]);

        let request = ChartRequest {
            category: Some(11),
            ..request
        };
        assert!(!inventory_trend(&request, &ctx).unwrap().is_ready());
    }
}
