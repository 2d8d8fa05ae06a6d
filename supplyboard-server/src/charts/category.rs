//! Per-category charts

use std::collections::BTreeSet;

use shared::models::SupplierId;

use super::shape::{CURRENCY, Chart, ChartResponse, ChartType, Series};
use super::{ChartContext, ChartKind, ChartRequest, NO_DATA_MESSAGE};
use crate::analytics::{Aggregation, BucketKey, Buckets, Catalog, Metric};

fn quantity_by_category(request: &ChartRequest, ctx: &ChartContext, supplier: Option<SupplierId>) -> Buckets {
    let filter = request.filter().with_supplier(supplier);
    Aggregation::new(filter, BucketKey::Category, Metric::Quantity).run(ctx.catalog, ctx.tz)
}

/// Names of the categories `supplier` has products in, sorted
fn supplier_categories(catalog: &Catalog, supplier: &SupplierId) -> Vec<String> {
    catalog
        .products_of(supplier)
        .flat_map(|p| p.category_ids.iter())
        .filter_map(|id| catalog.category_name(*id))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Quantity sold per category
///
/// Platform scope lists every category, zeros included. Supplier scope
/// lists the supplier's own categories and adds one series per competitor
/// that sold in them.
pub fn category_sales(request: &ChartRequest, ctx: &ChartContext) -> ChartResponse {
    match request.scope.supplier.clone() {
        None => platform_category_sales(request, ctx),
        Some(supplier) => supplier_category_sales(request, ctx, &supplier),
    }
}

fn platform_category_sales(request: &ChartRequest, ctx: &ChartContext) -> ChartResponse {
    let buckets = quantity_by_category(request, ctx, None);
    let categories: Vec<String> = ctx
        .catalog
        .snapshot()
        .categories
        .iter()
        .map(|c| c.name.clone())
        .collect();

    if buckets.is_empty() || categories.is_empty() {
        return ChartResponse::no_data(ChartKind::CategorySales, NO_DATA_MESSAGE);
    }

    let data = categories.iter().map(|name| buckets.value(name)).collect();
    Chart::new(ChartKind::CategorySales, ChartType::Bar, "Ventes par catégorie")
        .with_categories(categories)
        .with_series(Series::values("Quantité vendue", data))
        .x_title("Catégorie")
        .y_title("Quantité")
        .ready()
}

fn supplier_category_sales(request: &ChartRequest, ctx: &ChartContext, supplier: &SupplierId) -> ChartResponse {
    let categories = supplier_categories(ctx.catalog, supplier);
    let own = quantity_by_category(request, ctx, Some(supplier.clone()));
    let own_data: Vec<f64> = categories.iter().map(|name| own.value(name)).collect();

    if categories.is_empty() || own_data.iter().all(|v| *v == 0.0) {
        return ChartResponse::no_data(ChartKind::CategorySales, NO_DATA_MESSAGE);
    }

    let own_name = ctx
        .catalog
        .supplier(supplier)
        .map(|s| s.display_name())
        .unwrap_or_else(|| "Vos ventes".to_string());
    let mut chart = Chart::new(
        ChartKind::CategorySales,
        ChartType::Bar,
        "Ventes par catégorie face à la concurrence",
    )
    .with_categories(categories.clone())
    .with_series(Series::values(own_name, own_data))
    .x_title("Catégorie")
    .y_title("Quantité");

    let mut competitors = Vec::new();
    for competitor in &ctx.catalog.snapshot().suppliers {
        if &competitor.manufacturer_id == supplier {
            continue;
        }
        let sales = quantity_by_category(request, ctx, Some(competitor.manufacturer_id.clone()));
        let data: Vec<f64> = categories.iter().map(|name| sales.value(name)).collect();
        if data.iter().any(|v| *v > 0.0) {
            let name = competitor.display_name();
            competitors.push(name.clone());
            chart = chart.with_series(Series::values(name, data));
        }
    }

    chart.meta("competitors", competitors).ready()
}

/// Row revenue (tax included) per category
pub fn sales_by_category(request: &ChartRequest, ctx: &ChartContext) -> ChartResponse {
    let buckets = Aggregation::new(request.filter(), BucketKey::Category, Metric::RowRevenue)
        .run(ctx.catalog, ctx.tz)
        .retain(|v| v > 0.0);

    if buckets.is_empty() {
        return ChartResponse::no_data(ChartKind::SalesByCategory, NO_DATA_MESSAGE);
    }

    Chart::from_buckets(
        ChartKind::SalesByCategory,
        ChartType::Donut,
        "Chiffre d'affaires par catégorie",
        "Montant TTC",
        &buckets,
    )
    .unit(CURRENCY)
    .meta("total", buckets.total_value())
    .ready()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charts::shape::SeriesData;
    use crate::charts::{Scope, fixtures};
    use chrono_tz::Africa::Tunis;

    fn series(chart: &Chart, index: usize) -> (&str, Vec<f64>) {
        match &chart.series[index].data {
            SeriesData::Values(v) => (chart.series[index].name.as_str(), v.clone()),
            SeriesData::Points(_) => panic!("expected values"),
        }
    }

    #[test]
    fn test_platform_keeps_zero_categories() {
        let mut snapshot = fixtures::snapshot();
        snapshot.categories.push(serde_json::from_str(r#"{"categoryId": 12, "nameCategory": "Boissons"}"#).unwrap());
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let response = category_sales(&ChartRequest::new(Scope::platform()), &ctx);
        let chart = response.chart().unwrap();
        assert_eq!(chart.categories, vec!["Epicerie", "Pates", "Boissons"]);
        // Epicerie: 5 + 2 + 4 + 1, Pates: 4 + 6 + 1
        assert_eq!(series(chart, 0).1, vec![12.0, 11.0, 0.0]);
    }

    #[test]
    fn test_supplier_compared_with_competitors() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let response = category_sales(&ChartRequest::new(Scope::supplier("7".into())), &ctx);
        let chart = response.chart().unwrap();
        assert_eq!(chart.categories, vec!["Epicerie", "Pates"]);
        assert_eq!(series(chart, 0), ("Zitouna", vec![7.0, 6.0]));
        assert_eq!(series(chart, 1), ("Moulins", vec![5.0, 5.0]));
        assert_eq!(chart.meta["competitors"], serde_json::json!(["Moulins"]));
    }

    #[test]
    fn test_sales_by_category_row_totals() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let response = sales_by_category(&ChartRequest::new(Scope::platform()), &ctx);
        let chart = response.chart().unwrap();
        assert_eq!(chart.categories, vec!["Epicerie", "Pates"]);
        assert_eq!(series(chart, 0).1, vec![90.0, 38.0]);
    }
}
