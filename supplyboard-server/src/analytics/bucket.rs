//! Bucket-key derivation
//!
//! Time keys are zero padded so that lexicographic order is chronological
//! order. Categorical keys are plain labels.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use shared::models::{Order, OrderItem, customer::UNKNOWN_SEGMENT};

use super::catalog::Catalog;
use crate::utils::{AppError, ErrorCode};

/// Time granularity of a trend chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Granularity {
    /// `YYYY-MM-DD`
    Daily,
    /// `YYYY-Wnn`, nn = ceil(day-of-month / 7)
    Weekly,
    /// `YYYY-Wnn`, ISO 8601 week (year is the ISO week-year)
    IsoWeekly,
    /// `YYYY-MM`
    Monthly,
    /// `YYYY-Qn`
    Quarterly,
    /// `YYYY-S1` / `YYYY-S2`
    Semestrial,
    /// `YYYY`
    #[default]
    Yearly,
}

impl Granularity {
    pub const ALL: [Granularity; 7] = [
        Self::Daily,
        Self::Weekly,
        Self::IsoWeekly,
        Self::Monthly,
        Self::Quarterly,
        Self::Semestrial,
        Self::Yearly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::IsoWeekly => "iso_weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Semestrial => "semestrial",
            Self::Yearly => "yearly",
        }
    }

    /// Bucket key of a local calendar date
    pub fn key(&self, date: NaiveDate) -> String {
        match self {
            Self::Daily => date.format("%Y-%m-%d").to_string(),
            Self::Weekly => format!("{:04}-W{:02}", date.year(), date.day().div_ceil(7)),
            Self::IsoWeekly => {
                let week = date.iso_week();
                format!("{:04}-W{:02}", week.year(), week.week())
            }
            Self::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
            Self::Quarterly => format!("{:04}-Q{}", date.year(), quarter_of(date)),
            Self::Semestrial => {
                let half = if date.month() <= 6 { 1 } else { 2 };
                format!("{:04}-S{}", date.year(), half)
            }
            Self::Yearly => format!("{:04}", date.year()),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Granularity {
    type Err = AppError;

    /// Accepts the English names and the dashboard's French labels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" | "quotidien" => Ok(Self::Daily),
            "weekly" | "week" | "hebdomadaire" => Ok(Self::Weekly),
            "iso_weekly" | "iso_week" | "isoweek" => Ok(Self::IsoWeekly),
            "monthly" | "month" | "mensuel" => Ok(Self::Monthly),
            "quarterly" | "quarter" | "trimestriel" => Ok(Self::Quarterly),
            "semestrial" | "semester" | "half_year" | "semestriel" => Ok(Self::Semestrial),
            "yearly" | "year" | "annual" | "annuel" => Ok(Self::Yearly),
            other => Err(AppError::with_message(
                ErrorCode::InvalidGranularity,
                format!("Unknown granularity: {}", other),
            )
            .with_detail(
                "allowed",
                Granularity::ALL
                    .iter()
                    .map(|g| g.as_str())
                    .collect::<Vec<_>>(),
            )),
        }
    }
}

/// Calendar quarter 1..=4
pub fn quarter_of(date: NaiveDate) -> u32 {
    date.month0() / 3 + 1
}

/// How records are grouped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketKey {
    /// Order date at a granularity
    Time(Granularity),
    /// Every name of the item's product categories
    Category,
    /// Region of the customer's first address
    Region,
    /// Customer retailer profile
    Segment,
    /// Product name (line item name as fallback)
    ProductName,
    /// Product id
    Product,
    /// Warehouse (store) id
    Warehouse,
    /// Single bucket holding everything
    Total,
}

/// Key under which the whole set is reduced by [`BucketKey::Total`]
pub const TOTAL_KEY: &str = "total";

impl BucketKey {
    /// Keys of an order; `None` for item-level keys
    ///
    /// An empty vector means the order belongs to no bucket.
    pub fn order_keys(
        &self,
        order: &Order,
        local_date: NaiveDate,
        catalog: &Catalog,
    ) -> Option<Vec<String>> {
        let customer = || order.customer_id.and_then(|id| catalog.customer(id));
        let keys = match self {
            Self::Time(granularity) => vec![granularity.key(local_date)],
            Self::Region => customer()
                .and_then(|c| c.region())
                .map(|r| vec![r.to_string()])
                .unwrap_or_default(),
            Self::Segment => match order.customer_id {
                Some(_) => vec![
                    customer()
                        .map(|c| c.segment())
                        .unwrap_or(UNKNOWN_SEGMENT)
                        .to_string(),
                ],
                None => Vec::new(),
            },
            Self::Warehouse => order
                .store_id
                .map(|id| vec![id.to_string()])
                .unwrap_or_default(),
            Self::Total => vec![TOTAL_KEY.to_string()],
            Self::Category | Self::ProductName | Self::Product => return None,
        };
        Some(keys)
    }

    /// Keys of a line item for item-level keys
    pub fn item_keys(&self, item: &OrderItem, catalog: &Catalog) -> Vec<String> {
        let product = catalog.product(item.product_id);
        match self {
            Self::Category => product
                .map(|p| {
                    p.category_ids
                        .iter()
                        .filter_map(|id| catalog.category_name(*id))
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            Self::ProductName => product
                .map(|p| p.name.as_str())
                .filter(|name| !name.is_empty())
                .or(item.name.as_deref())
                .map(|name| vec![name.to_string()])
                .unwrap_or_default(),
            Self::Product => vec![item.product_id.to_string()],
            _ => Vec::new(),
        }
    }
}
