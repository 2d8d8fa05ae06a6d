//! Time-series charts

use super::shape::{CURRENCY, Chart, ChartResponse, ChartType};
use super::{ChartContext, ChartKind, ChartRequest, NO_DATA_MESSAGE};
use crate::analytics::{Aggregation, BucketKey, Metric};

/// Value metric (turnover or revenue) per time bucket
pub fn sales_trend(request: &ChartRequest, ctx: &ChartContext) -> ChartResponse {
    let granularity = request.granularity.unwrap_or_default();
    let metric = request.metric.unwrap_or_else(|| request.scope.value_metric());
    let buckets = Aggregation::new(request.filter(), BucketKey::Time(granularity), metric)
        .run(ctx.catalog, ctx.tz);

    if buckets.is_empty() {
        return ChartResponse::no_data(ChartKind::SalesTrend, NO_DATA_MESSAGE);
    }

    let label = if metric == request.scope.value_metric() {
        request.scope.value_label()
    } else {
        metric.as_str()
    };
    Chart::from_buckets(
        ChartKind::SalesTrend,
        ChartType::Area,
        "Évolution des ventes",
        label,
        &buckets,
    )
    .x_title("Période")
    .y_title(label)
    .unit(CURRENCY)
    .meta("granularity", granularity.as_str())
    .meta("metric", metric.as_str())
    .meta("total", buckets.total_value())
    .ready()
}

/// Refunded amount per time bucket; buckets without refunds are dropped
pub fn refund_trend(request: &ChartRequest, ctx: &ChartContext) -> ChartResponse {
    let granularity = request.granularity.unwrap_or_default();
    let buckets = Aggregation::new(
        request.filter(),
        BucketKey::Time(granularity),
        Metric::RefundAmount,
    )
    .run(ctx.catalog, ctx.tz)
    .retain(|refunded| refunded > 0.0);

    if buckets.is_empty() {
        return ChartResponse::no_data(
            ChartKind::RefundTrend,
            "Aucun remboursement pour la période sélectionnée",
        );
    }

    Chart::from_buckets(
        ChartKind::RefundTrend,
        ChartType::Bar,
        "Remboursements",
        "Montant remboursé",
        &buckets,
    )
    .x_title("Période")
    .unit(CURRENCY)
    .meta("granularity", granularity.as_str())
    .meta("total", buckets.total_value())
    .ready()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::{Catalog, DateRange, Granularity};
    use crate::charts::shape::SeriesData;
    use crate::charts::{Scope, fixtures};
    use chrono::NaiveDate;
    use chrono_tz::Africa::Tunis;

    fn values(response: &ChartResponse) -> (Vec<String>, Vec<f64>) {
        let chart = response.chart().expect("chart should be ready");
        match &chart.series[0].data {
            SeriesData::Values(v) => (chart.categories.clone(), v.clone()),
            SeriesData::Points(_) => panic!("expected values"),
        }
    }

    #[test]
    fn test_platform_sales_trend_yearly_default() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let response = sales_trend(&ChartRequest::new(Scope::platform()), &ctx);
        let (labels, data) = values(&response);
        // 2023: 1 x 4; 2024: 5x10 + 2x10 + 4x4 + 6x3, the canceled order is skipped
        assert_eq!(labels, vec!["2023", "2024"]);
        assert_eq!(data, vec![4.0, 104.0]);
    }

    #[test]
    fn test_supplier_sales_trend_uses_turnover() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);
        let request = ChartRequest {
            granularity: Some(Granularity::Monthly),
            ..ChartRequest::new(Scope::supplier("7".into()))
        };

        let (labels, data) = values(&sales_trend(&request, &ctx));
        assert_eq!(labels, vec!["2024-01", "2024-02", "2024-04"]);
        assert_eq!(data, vec![30.0, 12.0, 12.0]);
    }

    #[test]
    fn test_sales_trend_range_without_orders() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);
        let day = |m, d| NaiveDate::from_ymd_opt(2022, m, d);
        let request = ChartRequest {
            range: DateRange::new(day(1, 1), day(12, 31)).unwrap(),
            ..ChartRequest::new(Scope::platform())
        };

        assert!(!sales_trend(&request, &ctx).is_ready());
    }

    #[test]
    fn test_refund_trend_keeps_positive_buckets() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);
        let request = ChartRequest {
            granularity: Some(Granularity::Monthly),
            ..ChartRequest::new(Scope::platform())
        };

        let (labels, data) = values(&refund_trend(&request, &ctx));
        assert_eq!(labels, vec!["2023-11", "2024-02"]);
        assert_eq!(data, vec![4.0, 4.0]);
    }

    #[test]
    fn test_supplier_without_refunds_is_no_data() {
        let snapshot = fixtures::snapshot();
        let catalog = Catalog::new(&snapshot);
        let ctx = ChartContext::new(&catalog, Tunis);

        let response = refund_trend(&ChartRequest::new(Scope::supplier("7".into())), &ctx);
        assert!(!response.is_ready());
    }
}
