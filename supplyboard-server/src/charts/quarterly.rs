//! Quarterly metrics table

use serde_json::{Value, json};

use super::shape::{CURRENCY, Chart, ChartResponse, ChartType, Series, Table};
use super::{ChartContext, ChartKind, ChartRequest};
use crate::analytics::{Accumulator, Aggregation, BucketKey, DateRange, Granularity, Metric};
use chrono::Datelike;

/// Years having at least one order in scope, latest first
pub fn available_years(request: &ChartRequest, ctx: &ChartContext) -> Vec<i32> {
    let buckets = Aggregation::new(
        request.scope.filter(DateRange::all()),
        BucketKey::Time(Granularity::Yearly),
        Metric::OrderCount,
    )
    .run(ctx.catalog, ctx.tz);

    let mut years: Vec<i32> = buckets
        .labels()
        .iter()
        .filter_map(|label| label.parse().ok())
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years
}

/// Requested year, else the current year when it has data, else the latest year
pub(super) fn selected_year(request: &ChartRequest, ctx: &ChartContext, years: &[i32]) -> Option<i32> {
    if request.year.is_some() {
        return request.year;
    }
    let current = ctx.today.year();
    if years.contains(&current) {
        Some(current)
    } else {
        years.first().copied()
    }
}

/// Order count, unique customers and value per quarter of one year
pub fn quarterly_metrics(request: &ChartRequest, ctx: &ChartContext) -> ChartResponse {
    let years = available_years(request, ctx);
    let Some(year) = selected_year(request, ctx, &years) else {
        return ChartResponse::no_data(ChartKind::QuarterlyMetrics, "Aucune commande disponible");
    };

    let metric = request.scope.value_metric();
    let buckets = Aggregation::new(
        request.scope.filter(DateRange::year(year)),
        BucketKey::Time(Granularity::Quarterly),
        metric,
    )
    .run(ctx.catalog, ctx.tz);

    if buckets.is_empty() {
        return ChartResponse::no_data(
            ChartKind::QuarterlyMetrics,
            format!("Aucune commande pour l'année {}", year),
        );
    }

    let row = |label: String, acc: &Accumulator| -> Vec<Value> {
        vec![
            json!(label),
            json!(acc.order_count()),
            json!(acc.customers().len()),
            json!(acc.value(metric)),
        ]
    };

    let mut categories = Vec::with_capacity(buckets.len());
    let mut rows = Vec::with_capacity(buckets.len() + 1);
    for (key, acc) in buckets.iter() {
        // "2024-Q3" -> "T3"
        let quarter = key.rsplit('Q').next().unwrap_or(key);
        let label = format!("T{}", quarter);
        rows.push(row(label.clone(), acc));
        categories.push(label);
    }
    let total = buckets.total();
    rows.push(row("Total".to_string(), &total));

    let value_label = request.scope.value_label();
    Chart::new(
        ChartKind::QuarterlyMetrics,
        ChartType::Table,
        format!("Indicateurs trimestriels {}", year),
    )
    .with_categories(categories)
    .with_series(Series::values(
        "Commandes",
        buckets
            .iter()
            .map(|(_, acc)| acc.order_count() as f64)
            .collect(),
    ))
    .with_series(Series::values(
        "Clients uniques",
        buckets
            .iter()
            .map(|(_, acc)| acc.customers().len() as f64)
            .collect(),
    ))
    .with_series(Series::values(value_label, buckets.values()))
    .with_table(Table {
        columns: vec![
            "Trimestre".to_string(),
            "Commandes".to_string(),
            "Clients uniques".to_string(),
            value_label.to_string(),
        ],
        rows,
    })
    .unit(CURRENCY)
    .meta("year", year)
    .meta("available_years", years)
    .ready()
}
