//! Charts API Handlers

use axum::extract::{Path, State};

use crate::api::query::ensure_supplier_known;
use crate::api::{DashboardQuery, with_snapshot};
use crate::auth::CurrentSession;
use crate::charts::{self, ChartKind, ChartResponse};
use crate::core::ServerState;
use crate::utils::{ApiResult, ok};

/// GET /api/charts - 可用图表
pub async fn list() -> ApiResult<Vec<&'static str>> {
    ok(ChartKind::ALL.iter().map(ChartKind::as_str).collect())
}

/// GET /api/charts/{chart} - 计算单个图表
///
/// 过滤后没有数据时返回 `status = "no_data"`，不是错误。
pub async fn render(
    State(state): State<ServerState>,
    session: CurrentSession,
    Path(chart): Path<String>,
    query: DashboardQuery,
) -> ApiResult<ChartResponse> {
    let kind: ChartKind = chart.parse()?;
    let scope = query.scope(&session)?;
    let request = query.chart_request(scope)?;

    let response = with_snapshot(&state, |ctx| {
        ensure_supplier_known(&request.scope, ctx.catalog)?;
        charts::render(kind, &request, ctx)
    })
    .await?;
    ok(response)
}
