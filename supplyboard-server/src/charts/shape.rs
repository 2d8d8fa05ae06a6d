//! Chart-options shaping
//!
//! Aggregates leave the pipeline as [`crate::analytics::Buckets`]; the
//! presentation layer receives a [`ChartResponse`]. Sorted bucket labels
//! become x-axis categories and aggregate values become series data.

use serde::Serialize;
use serde_json::{Map, Value};

use super::ChartKind;
use crate::analytics::Buckets;

/// Currency label of monetary series
pub const CURRENCY: &str = "TND";

// ============================================================================
// Response Types
// ============================================================================

/// Result of a chart request
///
/// An empty aggregate is a regular response, never an error.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChartResponse {
    Ready(Chart),
    NoData { chart: ChartKind, message: String },
}

impl ChartResponse {
    pub fn no_data(chart: ChartKind, message: impl Into<String>) -> Self {
        Self::NoData {
            chart,
            message: message.into(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    pub fn chart(&self) -> Option<&Chart> {
        match self {
            Self::Ready(chart) => Some(chart),
            Self::NoData { .. } => None,
        }
    }
}

/// Visual form hint for the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartType {
    Area,
    Bar,
    Pie,
    Donut,
    Treemap,
    Line,
    Table,
}

#[derive(Debug, Clone, Serialize)]
pub struct Chart {
    pub chart: ChartKind,
    #[serde(rename = "type")]
    pub kind: ChartType,
    pub title: String,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    pub options: ChartOptions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table: Option<Table>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub meta: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub data: SeriesData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SeriesData {
    /// One value per category
    Values(Vec<f64>),
    /// Timestamped points (`x` in epoch millis)
    Points(Vec<Point>),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: i64,
    pub y: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChartOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub stacked: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

// ============================================================================
// Builders
// ============================================================================

impl Series {
    pub fn values(name: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            data: SeriesData::Values(values),
        }
    }

    pub fn points(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            data: SeriesData::Points(points),
        }
    }

    pub fn is_empty(&self) -> bool {
        match &self.data {
            SeriesData::Values(v) => v.is_empty(),
            SeriesData::Points(p) => p.is_empty(),
        }
    }
}

impl Chart {
    pub fn new(chart: ChartKind, kind: ChartType, title: impl Into<String>) -> Self {
        Self {
            chart,
            kind,
            title: title.into(),
            categories: Vec::new(),
            series: Vec::new(),
            options: ChartOptions::default(),
            table: None,
            meta: Map::new(),
        }
    }

    /// Categories and a single series taken from `buckets`
    pub fn from_buckets(
        chart: ChartKind,
        kind: ChartType,
        title: impl Into<String>,
        series_name: impl Into<String>,
        buckets: &Buckets,
    ) -> Self {
        Self::new(chart, kind, title)
            .with_categories(buckets.labels())
            .with_series(Series::values(series_name, buckets.values()))
    }

    pub fn with_categories(mut self, categories: Vec<String>) -> Self {
        self.categories = categories;
        self
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.table = Some(table);
        self
    }

    pub fn x_title(mut self, title: impl Into<String>) -> Self {
        self.options.x_title = Some(title.into());
        self
    }

    pub fn y_title(mut self, title: impl Into<String>) -> Self {
        self.options.y_title = Some(title.into());
        self
    }

    pub fn unit(mut self, unit: impl Into<String>) -> Self {
        self.options.unit = Some(unit.into());
        self
    }

    pub fn stacked(mut self) -> Self {
        self.options.stacked = true;
        self
    }

    pub fn meta(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.meta.insert(key.to_string(), value.into());
        self
    }

    pub fn ready(self) -> ChartResponse {
        ChartResponse::Ready(self)
    }
}
