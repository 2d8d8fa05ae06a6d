//! Product rankings and the available-stock list

use serde_json::json;
use shared::models::{Product, ProductId};

use super::shape::{CURRENCY, Chart, ChartResponse, ChartType, Series, Table};
use super::{ChartContext, ChartKind, ChartRequest, NO_DATA_MESSAGE, SearchField};
use crate::analytics::money::percentage;
use crate::analytics::{Aggregation, BucketKey, Metric};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Products in a top-products ranking
pub const TOP_PRODUCTS_LIMIT: usize = 10;
/// Rows per page of the available-products list
pub const PRODUCTS_PER_PAGE: usize = 6;

/// Ranking metric: `volume`, `revenue` (row total) or `turnover`
fn ranking_metric(requested: Option<Metric>) -> AppResult<Metric> {
    match requested {
        None | Some(Metric::Quantity) => Ok(Metric::Quantity),
        Some(Metric::Revenue) | Some(Metric::RowRevenue) => Ok(Metric::RowRevenue),
        Some(Metric::Turnover) => Ok(Metric::Turnover),
        Some(other) => Err(AppError::with_message(
            ErrorCode::InvalidMetric,
            format!("Metric {} cannot rank products", other),
        )
        .with_detail("allowed", vec!["volume", "revenue", "turnover"])),
    }
}

fn product_label(ctx: &ChartContext, key: &str) -> String {
    key.parse::<ProductId>()
        .ok()
        .and_then(|id| ctx.catalog.product(id))
        .map(|p| p.name.clone())
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| format!("Produit {}", key))
}

/// Ten best products of complete orders
pub fn top_products(request: &ChartRequest, ctx: &ChartContext) -> AppResult<ChartResponse> {
    let metric = ranking_metric(request.metric)?;
    let buckets = Aggregation::new(request.filter().complete_only(), BucketKey::Product, metric)
        .run(ctx.catalog, ctx.tz)
        .retain(|v| v > 0.0);

    if buckets.is_empty() {
        return Ok(ChartResponse::no_data(ChartKind::TopProducts, NO_DATA_MESSAGE));
    }

    let mut ranked = buckets.pairs();
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
    ranked.truncate(TOP_PRODUCTS_LIMIT);

    let labels = ranked.iter().map(|(key, _)| product_label(ctx, key)).collect();
    let values = ranked.iter().map(|(_, value)| *value).collect();
    let (series_name, unit) = match metric {
        Metric::Quantity => ("Volume", None),
        Metric::RowRevenue => ("Revenu", Some(CURRENCY)),
        _ => ("Chiffre d'affaires", Some(CURRENCY)),
    };

    let mut chart = Chart::new(ChartKind::TopProducts, ChartType::Bar, "Meilleurs produits")
        .with_categories(labels)
        .with_series(Series::values(series_name, values))
        .meta("metric", metric.as_str());
    if let Some(unit) = unit {
        chart = chart.unit(unit);
    }
    Ok(chart.ready())
}

/// Quantity ordered per article name with its share of the total
pub fn top_articles(request: &ChartRequest, ctx: &ChartContext) -> ChartResponse {
    let buckets = Aggregation::new(request.filter(), BucketKey::ProductName, Metric::Quantity)
        .run(ctx.catalog, ctx.tz)
        .retain(|v| v > 0.0);

    if buckets.is_empty() {
        return ChartResponse::no_data(ChartKind::TopArticles, NO_DATA_MESSAGE);
    }

    let total = buckets.total().sum();
    let mut ranked: Vec<_> = buckets.iter().collect();
    ranked.sort_by(|a, b| b.1.sum().cmp(&a.1.sum()));

    let rows = ranked
        .iter()
        .enumerate()
        .map(|(rank, (name, acc))| {
            vec![
                json!(rank + 1),
                json!(name),
                json!(acc.value(Metric::Quantity)),
                json!(percentage(acc.sum(), total)),
            ]
        })
        .collect();

    Chart::new(ChartKind::TopArticles, ChartType::Treemap, "Articles les plus commandés")
        .with_categories(ranked.iter().map(|(name, _)| name.to_string()).collect())
        .with_series(Series::values(
            "Quantité commandée",
            ranked.iter().map(|(_, acc)| acc.value(Metric::Quantity)).collect(),
        ))
        .with_table(Table {
            columns: vec![
                "Rang".to_string(),
                "Article".to_string(),
                "Quantité".to_string(),
                "Part (%)".to_string(),
            ],
            rows,
        })
        .ready()
}

fn matches_search(product: &Product, request: &ChartRequest) -> bool {
    let Some(term) = request.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
        return true;
    };
    let term = term.to_lowercase();
    match request.search_by {
        SearchField::Name => product.name.to_lowercase().contains(&term),
        SearchField::Sku => product.sku.to_lowercase().contains(&term),
        SearchField::Id => product.product_id.to_string().contains(&term),
    }
}

/// Products currently in stock, paged
pub fn available_products(request: &ChartRequest, ctx: &ChartContext) -> ChartResponse {
    let stocked: Vec<(&Product, f64)> = match &request.scope.supplier {
        Some(supplier) => ctx
            .catalog
            .products_of(supplier)
            .filter(|p| p.is_in_stock() && p.stock_qty() != 0.0)
            .map(|p| (p, p.stock_qty()))
            .collect(),
        None => ctx
            .catalog
            .snapshot()
            .products
            .iter()
            .filter_map(|p| {
                let stock = ctx.catalog.stock(p.product_id)?;
                let quantity = match request.scope.warehouse {
                    Some(warehouse) => stock.quantity_in(warehouse).unwrap_or(0.0),
                    None => stock.total_quantity(),
                };
                (quantity > 0.0).then_some((p, quantity))
            })
            .collect(),
    };
    let matching: Vec<_> = stocked
        .into_iter()
        .filter(|(p, _)| request.category.is_none_or(|c| p.in_category(c)))
        .filter(|(p, _)| matches_search(p, request))
        .collect();

    if matching.is_empty() {
        return ChartResponse::no_data(ChartKind::AvailableProducts, "Aucun produit disponible en stock");
    }

    let total = matching.len();
    let total_pages = total.div_ceil(PRODUCTS_PER_PAGE);
    let page = request.page.unwrap_or(1).clamp(1, total_pages);
    let rows = matching
        .iter()
        .skip((page - 1) * PRODUCTS_PER_PAGE)
        .take(PRODUCTS_PER_PAGE)
        .map(|(p, quantity)| vec![json!(p.product_id), json!(p.name), json!(p.sku), json!(quantity)])
        .collect();

    Chart::new(ChartKind::AvailableProducts, ChartType::Table, "Produits disponibles")
        .with_table(Table {
            columns: vec![
                "ID".to_string(),
                "Nom".to_string(),
                "SKU".to_string(),
                "Quantité".to_string(),
            ],
            rows,
        })
        .meta("page", page)
        .meta("per_page", PRODUCTS_PER_PAGE)
        .meta("total", total)
        .meta("total_pages", total_pages)
        .ready()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::Catalog;
    use crate::charts::shape::SeriesData;
    use crate::charts::{Scope, fixtures};
    use chrono_tz::Africa::Tunis;

    fn data(chart: &Chart) -> Vec<f64> {
        match &chart.series[0].data {
            SeriesData::Values(v) => v.clone(),
            SeriesData::Points(_) => panic!("expected values"),
        }
    }

    #[test]
    fn test_top_products_by_metric() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let volume = top_products(&ChartRequest::new(Scope::platform()), &ctx).unwrap();
        let chart = volume.chart().unwrap();
        // Pates only appears in a processing order
        assert_eq!(chart.categories, vec!["Huile", "Semoule"]);
        assert_eq!(data(chart), vec![7.0, 5.0]);

        let request = ChartRequest {
            metric: Some(Metric::Revenue),
            ..ChartRequest::new(Scope::platform())
        };
        let revenue = top_products(&request, &ctx).unwrap();
        assert_eq!(data(revenue.chart().unwrap()), vec![70.0, 20.0]);

        let request = ChartRequest {
            metric: Some(Metric::Turnover),
            ..ChartRequest::new(Scope::platform())
        };
        let turnover = top_products(&request, &ctx).unwrap();
        assert_eq!(data(turnover.chart().unwrap()), vec![42.0, 15.0]);
    }

    #[test]
    fn test_top_products_rejects_counting_metric() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);
        let request = ChartRequest {
            metric: Some(Metric::DistinctCustomers),
            ..ChartRequest::new(Scope::platform())
        };

        let err = top_products(&request, &ctx).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidMetric);
    }

    #[test]
    fn test_top_articles_share() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let response = top_articles(&ChartRequest::new(Scope::supplier("7".into())), &ctx);
        let chart = response.chart().unwrap();
        assert_eq!(chart.categories, vec!["Huile", "Pates"]);
        let table = chart.table.as_ref().unwrap();
        assert_eq!(table.rows[0], vec![json!(1), json!("Huile"), json!(7.0), json!(53.85)]);
        assert_eq!(table.rows[1], vec![json!(2), json!("Pates"), json!(6.0), json!(46.15)]);
    }

    #[test]
    fn test_available_products_supplier() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let response = available_products(&ChartRequest::new(Scope::supplier("8".into())), &ctx);
        assert!(!response.is_ready());

        let response = available_products(&ChartRequest::new(Scope::supplier("7".into())), &ctx);
        let chart = response.chart().unwrap();
        assert_eq!(chart.meta["total"], 2);
    }

    #[test]
    fn test_available_products_platform_stock_and_search() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let all = available_products(&ChartRequest::new(Scope::platform()), &ctx);
        let table = all.chart().unwrap().table.clone().unwrap();
        // Huile: 12 + 3 over both warehouses
        assert_eq!(table.rows[0], vec![json!(1), json!("Huile"), json!("HU-1"), json!(15.0)]);
        assert_eq!(table.rows.len(), 2);

        let request = ChartRequest {
            search: Some("pa-".into()),
            search_by: SearchField::Sku,
            ..ChartRequest::new(Scope::platform().with_warehouse(Some(2)))
        };
        let found = available_products(&request, &ctx);
        let table = found.chart().unwrap().table.clone().unwrap();
        assert_eq!(table.rows, vec![vec![json!(3), json!("Pates"), json!("PA-3"), json!(9.0)]]);
    }

    #[test]
    fn test_available_products_paging() {
        let mut snapshot = fixtures::snapshot();
        for id in 100..110 {
            snapshot.products.push(
                serde_json::from_value(json!({
                    "product_id": id, "name": format!("P{}", id), "manufacturer": "7",
                    "stock_item": {"qty": 1, "is_in_stock": true}
                }))
                .unwrap(),
            );
        }
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);
        let request = ChartRequest {
            page: Some(5),
            ..ChartRequest::new(Scope::supplier("7".into()))
        };

        let chart = available_products(&request, &ctx);
        let chart = chart.chart().unwrap();
        // 12 products, page clamped to the last one
        assert_eq!(chart.meta["total_pages"], 2);
        assert_eq!(chart.meta["page"], 2);
        assert_eq!(chart.table.as_ref().unwrap().rows.len(), 6);
    }
}
