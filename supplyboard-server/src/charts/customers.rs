//! Customer charts (segments and regions)

use std::collections::BTreeSet;

use chrono::NaiveDate;

use super::quarterly::{available_years, selected_year};
use super::shape::{Chart, ChartResponse, ChartType, Series};
use super::{ChartContext, ChartKind, ChartRequest, NO_DATA_MESSAGE};
use crate::analytics::{Aggregation, BucketKey, Buckets, DateRange, Metric};

/// Unique customers per retailer profile, largest segment first
pub fn client_segments(request: &ChartRequest, ctx: &ChartContext) -> ChartResponse {
    let buckets = Aggregation::new(request.filter(), BucketKey::Segment, Metric::DistinctCustomers)
        .run(ctx.catalog, ctx.tz);

    if buckets.is_empty() {
        return ChartResponse::no_data(ChartKind::ClientSegments, NO_DATA_MESSAGE);
    }

    let mut pairs = buckets.pairs();
    // stable: ties keep label order
    pairs.sort_by(|a, b| b.1.total_cmp(&a.1));
    let (labels, counts): (Vec<_>, Vec<_>) = pairs.into_iter().unzip();

    Chart::new(ChartKind::ClientSegments, ChartType::Pie, "Segments de clientèle")
        .with_categories(labels)
        .with_series(Series::values("Clients", counts))
        .meta("total_customers", buckets.customers().len())
        .ready()
}

fn quarter_range(year: i32, quarter: u32) -> DateRange {
    let start = NaiveDate::from_ymd_opt(year, (quarter - 1) * 3 + 1, 1);
    let end = if quarter == 4 {
        NaiveDate::from_ymd_opt(year, 12, 31)
    } else {
        NaiveDate::from_ymd_opt(year, quarter * 3 + 1, 1).and_then(|d| d.pred_opt())
    };
    // start <= end always holds for a valid quarter
    DateRange::new(start, end).unwrap_or_else(|_| DateRange::year(year))
}

/// Unique customers per region (first address) for each quarter of a year
pub fn regions(request: &ChartRequest, ctx: &ChartContext) -> ChartResponse {
    let years = available_years(request, ctx);
    let Some(year) = selected_year(request, ctx, &years) else {
        return ChartResponse::no_data(ChartKind::Regions, NO_DATA_MESSAGE);
    };

    let quarters: Vec<Buckets> = (1..=4)
        .map(|q| {
            Aggregation::new(
                request.scope.filter(quarter_range(year, q)),
                BucketKey::Region,
                Metric::DistinctCustomers,
            )
            .run(ctx.catalog, ctx.tz)
        })
        .collect();

    let regions: BTreeSet<String> = quarters.iter().flat_map(|b| b.labels()).collect();
    if regions.is_empty() {
        return ChartResponse::no_data(
            ChartKind::Regions,
            format!("Aucun client localisé pour l'année {}", year),
        );
    }

    let mut chart = Chart::new(
        ChartKind::Regions,
        ChartType::Bar,
        format!("Clients par région {}", year),
    )
    .with_categories(regions.iter().cloned().collect())
    .x_title("Région")
    .y_title("Clients uniques")
    .stacked();

    for (index, buckets) in quarters.iter().enumerate() {
        let data = regions.iter().map(|region| buckets.value(region)).collect();
        chart = chart.with_series(Series::values(format!("T{}", index + 1), data));
    }

    chart.meta("year", year).meta("available_years", years).ready()
}
