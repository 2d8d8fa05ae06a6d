//! Filter predicate
//!
//! An order passes when it is not canceled, was created inside the date
//! range (local day bounds, both inclusive), belongs to the warehouse and,
//! for a supplier scope, contains at least one of the supplier's products.
//! Orders without `created_at` are dated at the epoch.

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::models::{Order, OrderItem, SupplierId, WarehouseId};

use super::catalog::Catalog;
use crate::utils::time::{day_end_millis, day_start_millis};
use crate::utils::{AppError, AppResult, ErrorCode};

/// Inclusive range of local calendar days; open ends are unbounded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> AppResult<Self> {
        if let (Some(s), Some(e)) = (start, end)
            && s > e
        {
            return Err(AppError::with_message(
                ErrorCode::InvalidDateRange,
                format!("Start date {} is after end date {}", s, e),
            ));
        }
        Ok(Self { start, end })
    }

    /// Unbounded range
    pub fn all() -> Self {
        Self::default()
    }

    /// Range covering one calendar year
    pub fn year(year: i32) -> Self {
        Self {
            start: NaiveDate::from_ymd_opt(year, 1, 1),
            end: NaiveDate::from_ymd_opt(year, 12, 31),
        }
    }

    pub fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    pub fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Inclusive `[start, end]` bounds in epoch millis
    pub fn bounds_millis(&self, tz: Tz) -> (i64, i64) {
        (
            self.start.map_or(i64::MIN, |d| day_start_millis(d, tz)),
            self.end.map_or(i64::MAX, |d| day_end_millis(d, tz)),
        )
    }
}

/// Active filters of a dashboard view
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub range: DateRange,
    pub warehouse: Option<WarehouseId>,
    /// Restricts items to this manufacturer's products
    pub supplier: Option<SupplierId>,
    /// Only `complete` orders (top products, inventory)
    pub complete_only: bool,
}

impl OrderFilter {
    pub fn new(range: DateRange) -> Self {
        Self {
            range,
            ..Default::default()
        }
    }

    pub fn with_warehouse(mut self, warehouse: Option<WarehouseId>) -> Self {
        self.warehouse = warehouse;
        self
    }

    pub fn with_supplier(mut self, supplier: Option<SupplierId>) -> Self {
        self.supplier = supplier;
        self
    }

    pub fn complete_only(mut self) -> Self {
        self.complete_only = true;
        self
    }

    /// Resolve date bounds in the business timezone
    pub fn compile(&self, tz: Tz) -> CompiledFilter<'_> {
        let (start_ms, end_ms) = self.range.bounds_millis(tz);
        CompiledFilter {
            filter: self,
            tz,
            start_ms,
            end_ms,
        }
    }
}

/// [`OrderFilter`] with its date bounds resolved to millis
#[derive(Debug, Clone, Copy)]
pub struct CompiledFilter<'f> {
    filter: &'f OrderFilter,
    tz: Tz,
    start_ms: i64,
    end_ms: i64,
}

impl CompiledFilter<'_> {
    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Whether a timestamp in millis lies inside the date range
    pub fn in_range(&self, millis: i64) -> bool {
        self.start_ms <= millis && millis <= self.end_ms
    }

    /// Order-level predicate
    pub fn matches_order(&self, order: &Order, catalog: &Catalog) -> bool {
        if order.state.is_canceled() {
            return false;
        }
        if self.filter.complete_only && !order.state.is_complete() {
            return false;
        }
        if let Some(warehouse) = self.filter.warehouse
            && order.store_id != Some(warehouse)
        {
            return false;
        }
        if !self.in_range(order.created_or_epoch().millis(self.tz)) {
            return false;
        }
        match &self.filter.supplier {
            Some(_) => order.items.iter().any(|item| self.matches_item(item, catalog)),
            None => true,
        }
    }

    /// Item-level predicate; other suppliers' lines are dropped
    pub fn matches_item(&self, item: &OrderItem, catalog: &Catalog) -> bool {
        match &self.filter.supplier {
            Some(supplier) => catalog.is_supplied_by(item.product_id, supplier),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Africa::Tunis;
    use serde_json::json;
    use supplyboard_client::DataSnapshot;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn order(value: serde_json::Value) -> Order {
        serde_json::from_value(value).unwrap()
    }

    fn snapshot() -> DataSnapshot {
        serde_json::from_value(json!({
            "products": [
                {"product_id": 1, "manufacturer": "7"},
                {"product_id": 2, "manufacturer": "8"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_inclusive_day_bounds() {
        let snapshot = snapshot();
        let catalog = Catalog::new(&snapshot);
        let filter = OrderFilter::new(DateRange::new(Some(day(2024, 3, 1)), Some(day(2024, 3, 31))).unwrap());
        let compiled = filter.compile(Tunis);

        let at = |ts: &str| order(json!({"created_at": ts, "state": "complete"}));
        assert!(compiled.matches_order(&at("2024-03-01 00:00:00.000"), &catalog));
        assert!(compiled.matches_order(&at("2024-03-31 23:59:59.999"), &catalog));
        assert!(!compiled.matches_order(&at("2024-02-29 23:59:59.999"), &catalog));
        assert!(!compiled.matches_order(&at("2024-04-01 00:00:00.000"), &catalog));
        // 2024-03-31T23:30:00Z is already April 1st in Tunis (UTC+1)
        assert!(!compiled.matches_order(&at("2024-03-31T23:30:00Z"), &catalog));
    }

    #[test]
    fn test_canceled_never_passes() {
        let snapshot = snapshot();
        let catalog = Catalog::new(&snapshot);
        let filter = OrderFilter::default();
        let canceled = order(json!({"created_at": "2024-03-01", "state": "canceled"}));
        assert!(!filter.compile(Tunis).matches_order(&canceled, &catalog));
    }

    #[test]
    fn test_missing_created_at_is_epoch() {
        let snapshot = snapshot();
        let catalog = Catalog::new(&snapshot);
        let undated = order(json!({"state": "complete"}));

        assert!(OrderFilter::default().compile(Tunis).matches_order(&undated, &catalog));
        let since_2000 = OrderFilter::new(DateRange::new(Some(day(2000, 1, 1)), None).unwrap());
        assert!(!since_2000.compile(Tunis).matches_order(&undated, &catalog));
    }

    #[test]
    fn test_warehouse_and_supplier() {
        let snapshot = snapshot();
        let catalog = Catalog::new(&snapshot);
        let o = order(json!({
            "created_at": "2024-03-01", "state": "complete", "store_id": 2,
            "items": [{"product_id": 2, "qty_invoiced": 1}]
        }));

        let in_store = OrderFilter::default().with_warehouse(Some(2));
        let other_store = OrderFilter::default().with_warehouse(Some(3));
        assert!(in_store.compile(Tunis).matches_order(&o, &catalog));
        assert!(!other_store.compile(Tunis).matches_order(&o, &catalog));

        let supplier_7 = OrderFilter::default().with_supplier(Some(SupplierId::from("7")));
        let supplier_8 = OrderFilter::default().with_supplier(Some(SupplierId::from("8")));
        assert!(!supplier_7.compile(Tunis).matches_order(&o, &catalog));
        assert!(supplier_8.compile(Tunis).matches_order(&o, &catalog));
        assert!(!supplier_7.compile(Tunis).matches_item(&o.items[0], &catalog));
    }

    #[test]
    fn test_complete_only() {
        let snapshot = snapshot();
        let catalog = Catalog::new(&snapshot);
        let processing = order(json!({"created_at": "2024-03-01", "state": "processing"}));

        assert!(OrderFilter::default().compile(Tunis).matches_order(&processing, &catalog));
        assert!(!OrderFilter::default().complete_only().compile(Tunis).matches_order(&processing, &catalog));
    }

    #[test]
    fn test_reversed_range_is_rejected() {
        let err = DateRange::new(Some(day(2024, 4, 1)), Some(day(2024, 3, 1))).unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidDateRange);
    }

    #[test]
    fn test_year_range() {
        let range = DateRange::year(2024);
        assert_eq!(range.start(), Some(day(2024, 1, 1)));
        assert_eq!(range.end(), Some(day(2024, 12, 31)));
    }
}
