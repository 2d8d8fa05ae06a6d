//! Dashboard API Handlers

use axum::extract::{Path, State};
use serde::Serialize;
use shared::models::{Supplier, SupplierId, Warehouse};
use shared::session::supplier_dashboard_route;

use crate::api::query::ensure_supplier_known;
use crate::api::{DashboardQuery, with_snapshot};
use crate::auth::CurrentSession;
use crate::charts::{ChartContext, Scope, Summary, platform_summary, supplier_summary};
use crate::core::ServerState;
use crate::utils::{ApiResult, AppError, AppResult, ErrorCode, ok};

/// 平台概览
#[derive(Debug, Serialize)]
pub struct OverviewResponse {
    pub summary: Summary,
    /// 仓库筛选项
    pub warehouses: Vec<Warehouse>,
}

/// 供应商列表项
#[derive(Debug, Serialize)]
pub struct SupplierEntry {
    pub supplier: Supplier,
    pub name: String,
    /// 超级管理员查看该供应商看板的页面
    pub dashboard_route: String,
}

/// 单个供应商看板
#[derive(Debug, Serialize)]
pub struct SupplierDashboard {
    pub supplier_id: SupplierId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<Supplier>,
    pub summary: Summary,
}

/// GET /api/dashboard/overview - 平台汇总卡片
pub async fn overview(
    State(state): State<ServerState>,
    query: DashboardQuery,
) -> ApiResult<OverviewResponse> {
    let range = query.range()?;
    let response = with_snapshot(&state, |ctx| {
        if let Some(warehouse) = query.warehouse
            && !ctx.catalog.snapshot().warehouses.is_empty()
            && !ctx.catalog.warehouse_exists(warehouse)
        {
            return Err(AppError::with_message(
                ErrorCode::WarehouseNotFound,
                format!("Warehouse {} not found", warehouse),
            ));
        }
        Ok(OverviewResponse {
            summary: platform_summary(range, query.warehouse, ctx),
            warehouses: ctx.catalog.snapshot().warehouses.clone(),
        })
    })
    .await?;
    ok(response)
}

/// GET /api/dashboard/suppliers - 供应商列表 (按名称排序)
pub async fn list_suppliers(State(state): State<ServerState>) -> ApiResult<Vec<SupplierEntry>> {
    let suppliers = with_snapshot(&state, |ctx| {
        let mut entries: Vec<SupplierEntry> = ctx
            .catalog
            .snapshot()
            .suppliers
            .iter()
            .map(|s| SupplierEntry {
                name: s.display_name(),
                dashboard_route: supplier_dashboard_route(&s.manufacturer_id),
                supplier: s.clone(),
            })
            .collect();
        entries.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        Ok(entries)
    })
    .await?;
    ok(suppliers)
}

fn supplier_dashboard(
    supplier_id: SupplierId,
    query: &DashboardQuery,
    ctx: &ChartContext<'_, '_>,
) -> AppResult<SupplierDashboard> {
    Ok(SupplierDashboard {
        summary: supplier_summary(&supplier_id, query.range()?, ctx),
        supplier: ctx.catalog.supplier(&supplier_id).cloned(),
        supplier_id,
    })
}

/// GET /api/dashboard/suppliers/{supplier_id} - 指定供应商的汇总卡片
pub async fn supplier(
    State(state): State<ServerState>,
    Path(supplier_id): Path<String>,
    query: DashboardQuery,
) -> ApiResult<SupplierDashboard> {
    let supplier_id = SupplierId::from(supplier_id.trim());
    let dashboard = with_snapshot(&state, |ctx| {
        ensure_supplier_known(&Scope::supplier(supplier_id.clone()), ctx.catalog)?;
        supplier_dashboard(supplier_id, &query, ctx)
    })
    .await?;
    ok(dashboard)
}

/// GET /api/dashboard/me - 当前供应商的汇总卡片
pub async fn me(
    State(state): State<ServerState>,
    session: CurrentSession,
    query: DashboardQuery,
) -> ApiResult<SupplierDashboard> {
    // require_role(Supplier) guarantees a manufacturer id
    let supplier_id = session
        .supplier_scope()
        .cloned()
        .ok_or_else(|| AppError::new(ErrorCode::RoleRequired))?;
    let dashboard = with_snapshot(&state, |ctx| supplier_dashboard(supplier_id, &query, ctx)).await?;
    ok(dashboard)
}
