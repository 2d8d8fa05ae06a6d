//! Dashboard query parameters
//!
//! Shared by the dashboard and chart handlers. Empty strings count as
//! absent since the dashboard sends cleared inputs as `?start=`.

use std::fmt::Display;
use std::str::FromStr;

use axum::extract::{FromRequestParts, Query};
use http::request::Parts;
use serde::{Deserialize, Deserializer};
use shared::models::{CategoryId, SupplierId, WarehouseId};
use shared::session::Session;
use validator::Validate;

use crate::analytics::{Catalog, DateRange, Granularity, Metric};
use crate::charts::{ChartRequest, Scope, SearchField};
use crate::security_log;
use crate::utils::time::parse_date;
use crate::utils::{AppError, AppResult, ErrorCode};

#[derive(Debug, Default, Deserialize, Validate)]
pub struct DashboardQuery {
    /// `YYYY-MM-DD`, inclusive
    pub start: Option<String>,
    /// `YYYY-MM-DD`, inclusive
    pub end: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub warehouse: Option<WarehouseId>,
    pub supplier: Option<String>,
    pub granularity: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(min = 1970, max = 9999))]
    pub year: Option<i32>,
    pub metric: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub category: Option<CategoryId>,
    #[serde(default, deserialize_with = "blank_as_none")]
    #[validate(range(min = 1))]
    pub page: Option<usize>,
    #[validate(length(max = 100))]
    pub search: Option<String>,
    pub search_by: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Numeric parameter; a blank value is absent
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match non_empty(&raw) {
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Extracts and validates the query string
///
/// Malformed values are reported through the API error envelope.
impl<S: Send + Sync> FromRequestParts<S> for DashboardQuery {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(query) = Query::<Self>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::validation(e.body_text()))?;
        query.check()?;
        Ok(query)
    }
}

impl DashboardQuery {
    pub fn check(&self) -> AppResult<()> {
        self.validate().map_err(|e| {
            let fields: Vec<String> = e.field_errors().keys().map(|k| k.to_string()).collect();
            AppError::validation(format!("Invalid query parameters: {}", fields.join(", ")))
                .with_detail("fields", fields)
        })
    }

    pub fn range(&self) -> AppResult<DateRange> {
        let start = non_empty(&self.start).map(parse_date).transpose()?;
        let end = non_empty(&self.end).map(parse_date).transpose()?;
        DateRange::new(start, end)
    }

    pub fn supplier(&self) -> Option<SupplierId> {
        non_empty(&self.supplier).map(SupplierId::from)
    }

    /// Scope the session may see for this query
    ///
    /// Suppliers are pinned to their own id; asking for another supplier is
    /// rejected. Superadmins get the platform view or the requested supplier.
    pub fn scope(&self, session: &Session) -> AppResult<Scope> {
        let requested = self.supplier();
        let scope = match session.supplier_scope() {
            Some(own) => {
                if let Some(other) = requested.as_ref().filter(|r| *r != own) {
                    security_log!(
                        "WARN",
                        "supplier_scope_violation",
                        user_id = session.user_id.clone(),
                        own_supplier = own.to_string(),
                        requested_supplier = other.to_string()
                    );
                    return Err(AppError::new(ErrorCode::SupplierScopeViolation));
                }
                Scope::supplier(own.clone())
            }
            None if session.is_superadmin() => match requested {
                Some(supplier) => Scope::supplier(supplier),
                None => Scope::platform(),
            },
            None => return Err(AppError::new(ErrorCode::RoleRequired)),
        };
        Ok(scope.with_warehouse(self.warehouse))
    }

    pub fn chart_request(&self, scope: Scope) -> AppResult<ChartRequest> {
        self.check()?;
        Ok(ChartRequest {
            scope,
            range: self.range()?,
            granularity: non_empty(&self.granularity)
                .map(str::parse::<Granularity>)
                .transpose()?,
            year: self.year,
            metric: non_empty(&self.metric).map(str::parse::<Metric>).transpose()?,
            category: self.category,
            page: self.page,
            search: non_empty(&self.search).map(str::to_string),
            search_by: non_empty(&self.search_by)
                .map(str::parse::<SearchField>)
                .transpose()?
                .unwrap_or_default(),
        })
    }
}

/// Reject a supplier scope naming an unknown supplier
pub fn ensure_supplier_known(scope: &Scope, catalog: &Catalog) -> AppResult<()> {
    match &scope.supplier {
        Some(id) if !catalog.snapshot().suppliers.is_empty() && catalog.supplier(id).is_none() => {
            Err(AppError::with_message(
                ErrorCode::SupplierNotFound,
                format!("Supplier {} not found", id),
            ))
        }
        _ => Ok(()),
    }
}
