//! Charts 模块 - 仪表盘图表
//!
//! Every chart is a thin configuration over [`crate::analytics::Aggregation`]
//! followed by shaping into a [`ChartResponse`].

pub mod category;
pub mod customers;
pub mod inventory;
pub mod products;
pub mod quarterly;
pub mod shape;
pub mod summary;
pub mod trend;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use chrono_tz::Tz;
use serde::Serialize;
use shared::models::{CategoryId, SupplierId, WarehouseId};

use crate::analytics::{Catalog, DateRange, Granularity, Metric, OrderFilter};
use crate::utils::{AppError, AppResult, ErrorCode};

pub use shape::{Chart, ChartResponse, ChartType, Point, Series, SeriesData, Table};
pub use summary::{Summary, platform_summary, supplier_summary};

/// Message carried by every `no_data` response
pub const NO_DATA_MESSAGE: &str = "Aucune donnée disponible pour la période sélectionnée";

/// Chart identifiers served under `/api/charts/{chart}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    SalesTrend,
    QuarterlyMetrics,
    RefundTrend,
    CategorySales,
    SalesByCategory,
    ClientSegments,
    Regions,
    InventoryTrend,
    TopProducts,
    TopArticles,
    AvailableProducts,
}

impl ChartKind {
    pub const ALL: [ChartKind; 11] = [
        Self::SalesTrend,
        Self::QuarterlyMetrics,
        Self::RefundTrend,
        Self::CategorySales,
        Self::SalesByCategory,
        Self::ClientSegments,
        Self::Regions,
        Self::InventoryTrend,
        Self::TopProducts,
        Self::TopArticles,
        Self::AvailableProducts,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SalesTrend => "sales_trend",
            Self::QuarterlyMetrics => "quarterly_metrics",
            Self::RefundTrend => "refund_trend",
            Self::CategorySales => "category_sales",
            Self::SalesByCategory => "sales_by_category",
            Self::ClientSegments => "client_segments",
            Self::Regions => "regions",
            Self::InventoryTrend => "inventory_trend",
            Self::TopProducts => "top_products",
            Self::TopArticles => "top_articles",
            Self::AvailableProducts => "available_products",
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| {
                AppError::with_message(ErrorCode::UnknownChart, format!("Unknown chart: {}", s))
                    .with_detail(
                        "allowed",
                        Self::ALL.iter().map(|k| k.as_str()).collect::<Vec<_>>(),
                    )
            })
    }
}

/// Whose data a chart shows
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope {
    /// `None` is the platform view
    pub supplier: Option<SupplierId>,
    pub warehouse: Option<WarehouseId>,
}

impl Scope {
    pub fn platform() -> Self {
        Self::default()
    }

    pub fn supplier(id: SupplierId) -> Self {
        Self {
            supplier: Some(id),
            warehouse: None,
        }
    }

    pub fn with_warehouse(mut self, warehouse: Option<WarehouseId>) -> Self {
        self.warehouse = warehouse;
        self
    }

    pub fn is_supplier(&self) -> bool {
        self.supplier.is_some()
    }

    /// Suppliers see turnover (cost side), the platform sees revenue
    pub fn value_metric(&self) -> Metric {
        if self.is_supplier() {
            Metric::Turnover
        } else {
            Metric::Revenue
        }
    }

    pub fn value_label(&self) -> &'static str {
        if self.is_supplier() {
            "Chiffre d'affaires"
        } else {
            "Revenu"
        }
    }

    pub fn filter(&self, range: DateRange) -> OrderFilter {
        OrderFilter::new(range)
            .with_warehouse(self.warehouse)
            .with_supplier(self.supplier.clone())
    }
}

/// Field matched by the product search box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SearchField {
    #[default]
    Name,
    Sku,
    Id,
}

impl FromStr for SearchField {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "name" => Ok(Self::Name),
            "sku" => Ok(Self::Sku),
            "id" => Ok(Self::Id),
            other => Err(AppError::validation(format!("Unknown search field: {}", other))),
        }
    }
}

/// Parameters of one chart request
#[derive(Debug, Clone, Default)]
pub struct ChartRequest {
    pub scope: Scope,
    pub range: DateRange,
    pub granularity: Option<Granularity>,
    pub year: Option<i32>,
    pub metric: Option<Metric>,
    pub category: Option<CategoryId>,
    /// 1-based
    pub page: Option<usize>,
    pub search: Option<String>,
    pub search_by: SearchField,
}

impl ChartRequest {
    pub fn new(scope: Scope) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    pub fn filter(&self) -> OrderFilter {
        self.scope.filter(self.range)
    }
}

/// Snapshot view a chart is computed against
#[derive(Debug, Clone, Copy)]
pub struct ChartContext<'c, 'a> {
    pub catalog: &'c Catalog<'a>,
    pub tz: Tz,
    /// Snapshot time in epoch millis; "now" for inventory end points
    pub now_ms: i64,
    /// Local date of the snapshot
    pub today: NaiveDate,
}

impl<'c, 'a> ChartContext<'c, 'a> {
    pub fn new(catalog: &'c Catalog<'a>, tz: Tz) -> Self {
        let fetched_at = catalog.snapshot().fetched_at;
        Self {
            catalog,
            tz,
            now_ms: fetched_at.timestamp_millis(),
            today: fetched_at.with_timezone(&tz).date_naive(),
        }
    }
}

/// Compute one chart
pub fn render(kind: ChartKind, request: &ChartRequest, ctx: &ChartContext) -> AppResult<ChartResponse> {
    if let Some(warehouse) = request.scope.warehouse
        && !ctx.catalog.warehouse_exists(warehouse)
        && !ctx.catalog.snapshot().warehouses.is_empty()
    {
        return Err(AppError::with_message(
            ErrorCode::WarehouseNotFound,
            format!("Warehouse {} not found", warehouse),
        ));
    }

    let response = match kind {
        ChartKind::SalesTrend => trend::sales_trend(request, ctx),
        ChartKind::RefundTrend => trend::refund_trend(request, ctx),
        ChartKind::QuarterlyMetrics => quarterly::quarterly_metrics(request, ctx),
        ChartKind::CategorySales => category::category_sales(request, ctx),
        ChartKind::SalesByCategory => category::sales_by_category(request, ctx),
        ChartKind::ClientSegments => customers::client_segments(request, ctx),
        ChartKind::Regions => customers::regions(request, ctx),
        ChartKind::InventoryTrend => inventory::inventory_trend(request, ctx)?,
        ChartKind::TopProducts => products::top_products(request, ctx)?,
        ChartKind::TopArticles => products::top_articles(request, ctx),
        ChartKind::AvailableProducts => products::available_products(request, ctx),
    };

    tracing::debug!(
        chart = %kind,
        supplier = ?request.scope.supplier,
        warehouse = ?request.scope.warehouse,
        ready = response.is_ready(),
        "Chart rendered"
    );
    Ok(response)
}
